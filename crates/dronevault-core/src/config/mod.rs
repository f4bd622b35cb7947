//! Configuration consumed when building the store client
//!
//! Values are passed in explicitly; reading them from the environment is the
//! host process's job.

mod connect;

pub use connect::{ConnectConfig, ConfigError, ConfigResult, normalize_base_url, DEFAULT_TIMEOUT};
