//! Bridge from the core `Logger` trait to `tracing`

use dronevault_core::Logger;

/// Forwards resolver log lines to `tracing` under the `dronevault` target
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn debug(&self, message: &str) {
        tracing::debug!(target: "dronevault", "{}", message);
    }

    fn info(&self, message: &str) {
        tracing::info!(target: "dronevault", "{}", message);
    }

    fn warn(&self, message: &str) {
        tracing::warn!(target: "dronevault", "{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "dronevault", "{}", message);
    }
}
