//! Logging utilities
//!
//! The adapter reports every degraded operation (unsupported feature, scope
//! mismatch, abandoned resource creation) through the `log` facade rather
//! than failing, so embedding applications control verbosity and sinks.

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system
///
/// Convenience for binaries; libraries should leave initialization to the
/// embedding application.
pub fn init() {
    env_logger::init();
}
