//! Backend trait definition

use async_trait::async_trait;

use crate::types::{Item, ItemSummary, Vault};
use super::error::ConnectResult;

/// Read-only access to a vault/item/field secret store
///
/// Implementations:
/// - `ConnectClient`: the REST API over HTTP
/// - `MemoryBackend`: in-memory fixtures for tests
///
/// Lookups by name or title are exact matches and must fail with
/// `ConnectError::NotFound` or `ConnectError::Ambiguous` unless exactly one
/// record matches.
#[async_trait]
pub trait SecretBackend: Send + Sync {
    /// Human-readable name of this backend
    fn name(&self) -> &str;

    /// Find the single vault with this exact name
    async fn find_vault_by_name(&self, name: &str) -> ConnectResult<Vault>;

    /// Find the single item with this exact title inside a vault
    async fn find_item_by_title(&self, vault_id: &str, title: &str) -> ConnectResult<ItemSummary>;

    /// Load an item with all of its fields and sections
    async fn get_item(&self, vault_id: &str, item_id: &str) -> ConnectResult<Item>;
}
