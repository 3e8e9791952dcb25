//! Tracing/logging setup shared by the binaries.

/// Tracing configuration (filters, formats).
pub mod tracing;

pub use self::tracing::LogFormat;

/// Initialize process-wide logging from the environment.
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init() {
    self::tracing::init(LogFormat::from_env());
}
