//! Connection settings for the secret store REST API

use std::time::Duration;
use url::Url;

/// Default HTTP timeout for each store round trip
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Versioned API root appended to the configured host
const API_VERSION_PATH: &str = "/v1";

/// Errors in the store connection settings
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing secret store host")]
    MissingHost,

    #[error("missing secret store token")]
    MissingToken,

    #[error("invalid secret store host: {0}")]
    InvalidHost(String),

    #[error("secret store host must include scheme and host")]
    IncompleteHost,
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Settings needed to talk to the secret store
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use dronevault_core::config::ConnectConfig;
///
/// let config = ConnectConfig::new("https://connect.example.com", "token")
///     .with_timeout(Duration::from_secs(5));
/// assert_eq!(config.api_root().unwrap().as_str(), "https://connect.example.com/v1");
/// ```
#[derive(Clone)]
pub struct ConnectConfig {
    /// Store base URL; normalised to a `/v1` root
    pub base_url: String,
    /// Bearer token sent on every request
    pub token: String,
    /// Per-request HTTP timeout
    pub timeout: Duration,
}

impl ConnectConfig {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the per-request timeout; zero keeps the default
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = if timeout.is_zero() { DEFAULT_TIMEOUT } else { timeout };
        self
    }

    /// Validate the settings and return the versioned API root
    pub fn api_root(&self) -> ConfigResult<Url> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::MissingHost);
        }
        if self.token.is_empty() {
            return Err(ConfigError::MissingToken);
        }
        normalize_base_url(self.base_url.trim())
    }
}

impl std::fmt::Debug for ConnectConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectConfig")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Normalise a host URL to the versioned API root
///
/// The path gets `/v1` appended unless it already ends with it; query and
/// fragment are dropped.
pub fn normalize_base_url(base_url: &str) -> ConfigResult<Url> {
    let mut url = Url::parse(base_url).map_err(|e| match e {
        url::ParseError::RelativeUrlWithoutBase => ConfigError::IncompleteHost,
        other => ConfigError::InvalidHost(other.to_string()),
    })?;
    if url.cannot_be_a_base() || url.host_str().map_or(true, str::is_empty) {
        return Err(ConfigError::IncompleteHost);
    }

    let trimmed = url.path().trim_end_matches('/').to_string();
    let path = if trimmed.ends_with(API_VERSION_PATH) {
        trimmed
    } else {
        format!("{}{}", trimmed, API_VERSION_PATH)
    };
    url.set_path(&path);
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}
