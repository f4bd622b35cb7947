//! REST client for a 1Password Connect style secret store
//!
//! Three read-only calls, each a single GET against the versioned API root:
//! - `GET /v1/vaults?filter=name eq "..."`
//! - `GET /v1/vaults/{vault}/items?filter=title eq "..."`
//! - `GET /v1/vaults/{vault}/items/{item}`

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use crate::config::ConnectConfig;
use crate::matching::exactly_one;
use crate::types::{Item, ItemSummary, Vault};
use super::error::{ConnectError, ConnectResult};
use super::query::{endpoint, equals_filter, filtered_endpoint};
use super::traits::SecretBackend;

/// HTTP client for the secret store
///
/// Cheap to share: the underlying `reqwest::Client` pools connections and is
/// safe for concurrent use.
#[derive(Clone)]
pub struct ConnectClient {
    api_root: Url,
    http: reqwest::Client,
    token: String,
}

/// Error payload the store returns alongside non-success statuses
#[derive(Debug, Default, Deserialize)]
struct ErrorPayload {
    #[serde(default)]
    message: String,
}

impl ConnectClient {
    /// Create a client with its own connection pool and the configured timeout
    pub fn new(config: &ConnectConfig) -> ConnectResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ConnectError::Transport)?;
        Self::with_http_client(config, http)
    }

    /// Create a client on top of an existing `reqwest::Client`
    pub fn with_http_client(config: &ConnectConfig, http: reqwest::Client) -> ConnectResult<Self> {
        let api_root = config.api_root()?;
        Ok(Self {
            api_root,
            http,
            token: config.token.clone(),
        })
    }

    /// The normalised API root requests are issued against
    pub fn api_root(&self) -> &Url {
        &self.api_root
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> ConnectResult<T> {
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(ConnectError::Transport)?;

        let status = response.status();
        let body = response.bytes().await.map_err(ConnectError::Transport)?;

        if status.is_success() {
            serde_json::from_slice(&body).map_err(ConnectError::Decode)
        } else {
            Err(api_error(status, &body))
        }
    }
}

/// Build an API error, preferring the JSON `message` over the status line
fn api_error(status: StatusCode, body: &[u8]) -> ConnectError {
    let message = serde_json::from_slice::<ErrorPayload>(body)
        .ok()
        .map(|payload| payload.message)
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| status_line(status));
    ConnectError::api(status.as_u16(), message)
}

/// `"429 Too Many Requests"`, or just the code for unregistered statuses
fn status_line(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => status.as_u16().to_string(),
    }
}

#[async_trait]
impl SecretBackend for ConnectClient {
    fn name(&self) -> &str {
        "connect"
    }

    async fn find_vault_by_name(&self, name: &str) -> ConnectResult<Vault> {
        let url = filtered_endpoint(&self.api_root, &["vaults"], &equals_filter("name", name));
        let vaults: Vec<Vault> = self.get(url).await?;
        exactly_one(vaults).into_result(
            || ConnectError::not_found(format!("vault \"{}\"", name)),
            |count| ConnectError::ambiguous(format!("vault name \"{}\"", name), count),
        )
    }

    async fn find_item_by_title(&self, vault_id: &str, title: &str) -> ConnectResult<ItemSummary> {
        let url = filtered_endpoint(
            &self.api_root,
            &["vaults", vault_id, "items"],
            &equals_filter("title", title),
        );
        let items: Vec<ItemSummary> = self.get(url).await?;
        exactly_one(items).into_result(
            || ConnectError::not_found(format!("item \"{}\" in vault {}", title, vault_id)),
            |count| ConnectError::ambiguous(format!("item title \"{}\" in vault {}", title, vault_id), count),
        )
    }

    async fn get_item(&self, vault_id: &str, item_id: &str) -> ConnectResult<Item> {
        let url = endpoint(&self.api_root, &["vaults", vault_id, "items", item_id]);
        self.get(url).await
    }
}

impl std::fmt::Debug for ConnectClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectClient")
            .field("api_root", &self.api_root.as_str())
            .finish_non_exhaustive()
    }
}
