//! Native binding lowering for the kern compiler.
//!
//! This crate rewrites external procedures annotated with the native-binding
//! marker (`@FfiNative<NativeSignature>('symbol')` in `dart:ffi`) into
//! ordinary procedures that call a lazily resolved, cached function pointer.
//!
//! # Pipeline Position
//!
//! ```text
//! Parse → Type Check → **Native Binding Lowering** → Code Generation
//! ```
//!
//! # What Happens During Lowering
//!
//! ```text
//! @FfiNative<Double Function(Double)>('Math_sqrt')
//! external double _sqrt(double x);
//! ```
//!
//! becomes
//!
//! ```text
//! static final double Function(double) _@FfiNative_Math_sqrt =
//!     NativeFunctionPointer.asFunction<Double Function(Double), double Function(double)>(
//!         _fromAddress<NativeFunction<Double Function(Double)>*>(
//!             _ffi_resolver("dart:math", "Math_sqrt")));
//!
//! static double _sqrt(double x) {
//!   return _@FfiNative_Math_sqrt(x);
//! }
//! ```
//!
//! The pass is a no-op when `dart:ffi` (or the configured library) does not
//! declare the marker class, and is idempotent: lowered procedures are no
//! longer external and are skipped on a second run.

mod config;
mod error;
pub mod testing;
mod transform;

pub use config::FfiNativeConfig;
pub use error::FfiNativeError;
pub use transform::{
    transform_libraries, transform_program, FfiNativeTransformer, LoweredProcedure,
    TransformSummary,
};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Call this once at startup. Safe to call multiple times.
/// Enable with `RUST_LOG=kern_ffi=debug` or `RUST_LOG=kern_ffi=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            // Another subscriber may already be installed by the embedding driver.
            let _ = tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .try_init();
        }
    });
}
