//! Secret path parsing: `vault/item[/field]`

use super::error::{ResolveError, ResolveResult};

/// A parsed secret path
///
/// `field` is empty when no selector was given, which selects the item's
/// password. Vault and item names cannot contain `/`; everything after the
/// second `/` belongs to the field selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretPath {
    pub vault: String,
    pub item: String,
    pub field: String,
}

impl std::str::FromStr for SecretPath {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_path(s)
    }
}

/// Parse a `vault/item[/field]` path, trimming each component
pub fn parse_path(path: &str) -> ResolveResult<SecretPath> {
    let mut parts = path.splitn(3, '/');
    let vault = parts.next().unwrap_or_default().trim();
    let item = parts.next().ok_or_else(|| malformed(path, "secret path must be formatted as vault/item[/field]"))?;
    let item = item.trim();
    if vault.is_empty() || item.is_empty() {
        return Err(malformed(path, "vault and item names cannot be empty"));
    }
    let field = parts.next().map(str::trim).unwrap_or_default();

    Ok(SecretPath {
        vault: vault.to_string(),
        item: item.to_string(),
        field: field.to_string(),
    })
}

fn malformed(path: &str, reason: &'static str) -> ResolveError {
    ResolveError::MalformedPath {
        path: path.to_string(),
        reason,
    }
}
