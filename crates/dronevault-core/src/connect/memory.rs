//! In-memory secret backend

use async_trait::async_trait;

use crate::matching::exactly_one;
use crate::types::{Item, ItemSummary, Vault};
use super::error::{ConnectError, ConnectResult};
use super::traits::SecretBackend;

/// In-memory backend for tests and local experiments
///
/// Matching follows the REST store: names and titles compare exactly, and a
/// lookup fails unless exactly one record matches. A configured failure makes
/// every call return the same API error.
///
/// # Example
///
/// ```
/// use dronevault_core::connect::MemoryBackend;
/// use dronevault_core::types::{Field, Item, Vault};
///
/// let backend = MemoryBackend::new()
///     .with_vault(Vault::new("v1", "Production Vault"))
///     .with_item("v1", Item::new("i1", "Database Credentials")
///         .with_field(Field::password("password", "hunter2")));
/// assert_eq!(backend.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    vaults: Vec<Vault>,
    items: Vec<(String, Item)>,
    failure: Option<(u16, String)>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a vault
    pub fn with_vault(mut self, vault: Vault) -> Self {
        self.vaults.push(vault);
        self
    }

    /// Add an item to the vault with the given id
    pub fn with_item(mut self, vault_id: impl Into<String>, item: Item) -> Self {
        self.items.push((vault_id.into(), item));
        self
    }

    /// Make every call fail with this API status and message
    pub fn failing_with(mut self, status: u16, message: impl Into<String>) -> Self {
        self.failure = Some((status, message.into()));
        self
    }

    /// Number of items across all vaults
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn check_failure(&self) -> ConnectResult<()> {
        match &self.failure {
            Some((status, message)) => Err(ConnectError::api(*status, message.clone())),
            None => Ok(()),
        }
    }

    fn items_in<'a>(&'a self, vault_id: &'a str) -> impl Iterator<Item = &'a Item> + 'a {
        self.items
            .iter()
            .filter(move |(owner, _)| owner == vault_id)
            .map(|(_, item)| item)
    }
}

#[async_trait]
impl SecretBackend for MemoryBackend {
    fn name(&self) -> &str {
        "memory"
    }

    async fn find_vault_by_name(&self, name: &str) -> ConnectResult<Vault> {
        self.check_failure()?;
        exactly_one(self.vaults.iter().filter(|v| v.name == name))
            .map(Clone::clone)
            .into_result(
                || ConnectError::not_found(format!("vault \"{}\"", name)),
                |count| ConnectError::ambiguous(format!("vault name \"{}\"", name), count),
            )
    }

    async fn find_item_by_title(&self, vault_id: &str, title: &str) -> ConnectResult<ItemSummary> {
        self.check_failure()?;
        exactly_one(self.items_in(vault_id).filter(|item| item.title == title))
            .map(|item| ItemSummary::new(item.id.clone(), item.title.clone()))
            .into_result(
                || ConnectError::not_found(format!("item \"{}\" in vault {}", title, vault_id)),
                |count| ConnectError::ambiguous(format!("item title \"{}\" in vault {}", title, vault_id), count),
            )
    }

    async fn get_item(&self, vault_id: &str, item_id: &str) -> ConnectResult<Item> {
        self.check_failure()?;
        self.items_in(vault_id)
            .find(|item| item.id == item_id)
            .cloned()
            .ok_or_else(|| ConnectError::api(404, format!("item {} not found in vault {}", item_id, vault_id)))
    }
}
