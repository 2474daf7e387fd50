//! Errors that halt native binding lowering.
//!
//! A missing FFI library or an unannotated procedure are not errors (the
//! pass skips them). Everything here means the input or the incremental
//! state is inconsistent, and compilation must stop rather than emit a
//! wrong binding.

use kern_ir::{IndexError, ReferenceError};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FfiNativeError {
    /// A helper declaration of the FFI library could not be resolved.
    #[error("native binding helper missing: {0}")]
    Index(#[from] IndexError),

    /// The resolver field is not declared with a function type.
    #[error("'{field}' must have a function type to be invoked as the native resolver")]
    ResolverNotCallable { field: String },

    /// The marker annotation does not have the shape validation guarantees.
    #[error("malformed native binding annotation on '{procedure}': {reason}")]
    MalformedAnnotation {
        procedure: String,
        reason: &'static str,
    },

    /// The library already declares a member with the generated name.
    #[error("'{library}' already declares '{name}'")]
    DuplicateAccessor { library: String, name: String },

    /// The pre-reserved slot for the generated field cannot identify it.
    #[error("reference slot for '{name}' is incompatible: {source}")]
    IdentityConflict {
        name: String,
        #[source]
        source: ReferenceError,
    },
}
