//! Logging abstractions
//!
//! The resolver reports through an injected `Logger` rather than a global,
//! so the host process decides where events go.

mod traits;
mod noop;

pub use traits::{Logger, LoggerExt, SharedLogger};
pub use noop::NoOpLogger;
