//! Shared logging setup for storefront binaries.

pub mod logging;

pub use logging::LogFormat;

/// Initialize process-wide logging.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init() {
    logging::init(LogFormat::from_env());
}
