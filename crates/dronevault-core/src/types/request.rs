//! Inbound secret requests and resolved values

use serde::{Deserialize, Serialize};

/// A named secret request from the CI system
///
/// `name` is the logical secret identifier. It must be non-empty but does not
/// take part in the lookup; it is carried through to logs and the response.
/// Repository and build metadata sent alongside are accepted and ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub path: String,
}

impl SecretRequest {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// A resolved secret
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretValue {
    /// The requested name, echoed back
    pub name: String,
    /// The secret value
    pub data: String,
    /// Whether the secret may be exposed to pull request builds; always false
    pub pull_request: bool,
}

impl SecretValue {
    pub fn new(name: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
            pull_request: false,
        }
    }
}

// Keep secret data out of debug output
impl std::fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretValue")
            .field("name", &self.name)
            .field("data", &"<redacted>")
            .field("pull_request", &self.pull_request)
            .finish()
    }
}
