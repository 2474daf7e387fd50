//! Names of the well-known declarations the pass binds against.

/// Configuration of the native binding lowering.
///
/// The defaults are the declarations of `dart:ffi`. Embedders with their
/// own FFI library can rename any of them; the shapes must stay the same:
///
/// - `marker_class` has one type parameter and a string field `native_name_field`
/// - `resolver_field` is a top-level field holding `int Function(String, String)`
/// - `from_address` is a top-level generic procedure taking the address
/// - `as_function` is a static procedure (of `as_function_class`, or top
///   level when `None`) taking the pointer, generic over the native and
///   language-level signatures
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct FfiNativeConfig {
    /// Import URI of the library declaring every helper below.
    pub ffi_library: String,
    pub marker_class: String,
    pub native_name_field: String,
    pub native_function_class: String,
    pub resolver_field: String,
    pub from_address: String,
    pub as_function_class: Option<String>,
    pub as_function: String,
    /// Prepended to the native symbol name to name the generated field.
    pub accessor_prefix: String,
}

impl Default for FfiNativeConfig {
    fn default() -> Self {
        FfiNativeConfig {
            ffi_library: "dart:ffi".to_owned(),
            marker_class: "FfiNative".to_owned(),
            native_name_field: "nativeName".to_owned(),
            native_function_class: "NativeFunction".to_owned(),
            resolver_field: "_ffi_resolver".to_owned(),
            from_address: "_fromAddress".to_owned(),
            as_function_class: Some("NativeFunctionPointer".to_owned()),
            as_function: "asFunction".to_owned(),
            accessor_prefix: "_@FfiNative_".to_owned(),
        }
    }
}

impl FfiNativeConfig {
    #[must_use]
    pub fn with_ffi_library(mut self, uri: impl Into<String>) -> Self {
        self.ffi_library = uri.into();
        self
    }

    #[must_use]
    pub fn with_marker_class(mut self, name: impl Into<String>) -> Self {
        self.marker_class = name.into();
        self
    }

    #[must_use]
    pub fn with_accessor_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.accessor_prefix = prefix.into();
        self
    }

    /// Name of the field generated for `symbol`.
    pub fn accessor_name(&self, symbol: &str) -> String {
        format!("{}{}", self.accessor_prefix, symbol)
    }
}
