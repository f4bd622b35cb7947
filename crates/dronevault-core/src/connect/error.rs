//! Store client error types

use thiserror::Error;

use crate::config::ConfigError;

/// Errors that can occur while talking to the secret store
#[derive(Error, Debug)]
pub enum ConnectError {
    /// The store answered with a non-success status
    #[error("secret store API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The request never got a response (DNS, TLS, connect, timeout)
    #[error("secret store transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// A success response whose body could not be decoded
    #[error("invalid secret store response: {0}")]
    Decode(#[source] serde_json::Error),

    /// A filtered lookup returned no records
    #[error("{0} not found")]
    NotFound(String),

    /// A filtered lookup returned more than one record
    #[error("{what} is ambiguous: {count} matches")]
    Ambiguous { what: String, count: usize },

    /// The client could not be built from its settings
    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),

    /// The caller cancelled the request
    #[error("request cancelled")]
    Cancelled,
}

impl ConnectError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn ambiguous(what: impl Into<String>, count: usize) -> Self {
        Self::Ambiguous {
            what: what.into(),
            count,
        }
    }

    /// Whether this is a zero-match lookup
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Whether this is a many-match lookup
    pub fn is_ambiguous(&self) -> bool {
        matches!(self, Self::Ambiguous { .. })
    }
}

pub type ConnectResult<T> = Result<T, ConnectError>;
