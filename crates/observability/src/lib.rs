//! Tracing/logging setup shared by binaries and integration tests.

/// Environment-driven logging configuration.
pub mod config;

/// Tracing subscriber installation (filters, formatting).
pub mod tracing;

pub use config::{LogFormat, ParseLogFormatError, TracingConfig};

/// Initialize process-wide tracing from the environment.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(&TracingConfig::from_env());
}

/// Initialize process-wide tracing from an explicit configuration.
pub fn init_with(config: &TracingConfig) {
    tracing::init(config);
}
