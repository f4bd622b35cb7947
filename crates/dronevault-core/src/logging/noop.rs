//! Silent logger

use super::traits::Logger;

/// Discards every line; the default for library callers and tests that do
/// not inspect resolver output
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpLogger;

impl Logger for NoOpLogger {
    fn debug(&self, _: &str) {}

    fn info(&self, _: &str) {}

    fn warn(&self, _: &str) {}

    fn error(&self, _: &str) {}
}
