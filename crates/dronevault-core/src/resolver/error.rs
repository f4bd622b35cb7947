//! Resolution error types

use thiserror::Error;

use crate::connect::ConnectError;

/// Flat classification of a resolution failure
///
/// Several `ResolveError` variants share a kind; they differ only in how the
/// message is phrased.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidRequest,
    MalformedPath,
    VaultNotFound,
    AmbiguousVault,
    ItemNotFound,
    AmbiguousItem,
    ItemFetchFailed,
    SectionNotFound,
    FieldNotFound,
    AmbiguousField,
    /// The store answered a lookup with an error status or a body that does
    /// not decode; `ResolveError::store_status` is only set for the former
    StoreApi,
    Transport,
    Cancelled,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidRequest => "invalid_request",
            ErrorKind::MalformedPath => "malformed_path",
            ErrorKind::VaultNotFound => "vault_not_found",
            ErrorKind::AmbiguousVault => "ambiguous_vault",
            ErrorKind::ItemNotFound => "item_not_found",
            ErrorKind::AmbiguousItem => "ambiguous_item",
            ErrorKind::ItemFetchFailed => "item_fetch_failed",
            ErrorKind::SectionNotFound => "section_not_found",
            ErrorKind::FieldNotFound => "field_not_found",
            ErrorKind::AmbiguousField => "ambiguous_field",
            ErrorKind::StoreApi => "store_api_error",
            ErrorKind::Transport => "transport_error",
            ErrorKind::Cancelled => "cancelled",
        }
    }

    /// Whether the requested vault, item, section or field does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ErrorKind::VaultNotFound
                | ErrorKind::ItemNotFound
                | ErrorKind::SectionNotFound
                | ErrorKind::FieldNotFound
        )
    }

    /// Whether several records matched and the caller has to be more specific
    pub fn is_ambiguous(&self) -> bool {
        matches!(
            self,
            ErrorKind::AmbiguousVault | ErrorKind::AmbiguousItem | ErrorKind::AmbiguousField
        )
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while resolving a secret request
///
/// Every message names the step and the vault, item, section or field it was
/// working on, so it can be read without the logs.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("invalid secret request: {0}")]
    InvalidRequest(String),

    #[error("malformed secret path \"{path}\": {reason}")]
    MalformedPath { path: String, reason: &'static str },

    #[error("lookup vault \"{vault}\": vault not found")]
    VaultNotFound { vault: String },

    #[error("lookup vault \"{vault}\": {count} vaults share this name; vault names must be unique to be addressed by path")]
    AmbiguousVault { vault: String, count: usize },

    #[error("lookup vault \"{vault}\": {source}")]
    VaultLookup {
        vault: String,
        #[source]
        source: ConnectError,
    },

    #[error("lookup item \"{item}\" in vault \"{vault}\": item not found")]
    ItemNotFound { vault: String, item: String },

    #[error("lookup item \"{item}\" in vault \"{vault}\": {count} items share this title; item titles must be unique within a vault to be addressed by path")]
    AmbiguousItem { vault: String, item: String, count: usize },

    #[error("lookup item \"{item}\" in vault \"{vault}\": {source}")]
    ItemLookup {
        vault: String,
        item: String,
        #[source]
        source: ConnectError,
    },

    #[error("load item \"{item}\": {source}")]
    ItemFetchFailed {
        item: String,
        #[source]
        source: ConnectError,
    },

    #[error("section \"{section}\" not found in item \"{item}\"")]
    SectionNotFound { item: String, section: String },

    #[error("field \"{field}\" not found in item \"{item}\"")]
    FieldNotFound { item: String, field: String },

    #[error("field \"{field}\" not found in section \"{section}\" of item \"{item}\"")]
    FieldNotFoundInSection { item: String, section: String, field: String },

    #[error("item \"{item}\" does not contain notes")]
    NotesNotFound { item: String },

    #[error("item \"{item}\" defines {count} password fields; specify the desired field label")]
    AmbiguousPassword { item: String, count: usize },

    #[error("field label \"{field}\" is ambiguous in item \"{item}\" ({count} matches); use a section-qualified label such as \"<section>/{field}\"")]
    AmbiguousField { item: String, field: String, count: usize },

    #[error("field \"{field}\" is duplicated in section \"{section}\" of item \"{item}\" ({count} matches); give the fields distinct labels or sections")]
    DuplicateFieldInSection {
        item: String,
        section: String,
        field: String,
        count: usize,
    },

    #[error("secret resolution cancelled")]
    Cancelled,
}

impl ResolveError {
    /// Classify a vault lookup failure from the backend
    pub fn vault_lookup(vault: &str, source: ConnectError) -> Self {
        let vault = vault.to_string();
        match source {
            ConnectError::NotFound(_) => Self::VaultNotFound { vault },
            ConnectError::Ambiguous { count, .. } => Self::AmbiguousVault { vault, count },
            ConnectError::Cancelled => Self::Cancelled,
            source => Self::VaultLookup { vault, source },
        }
    }

    /// Classify an item lookup failure from the backend
    pub fn item_lookup(vault: &str, item: &str, source: ConnectError) -> Self {
        let vault = vault.to_string();
        let item = item.to_string();
        match source {
            ConnectError::NotFound(_) => Self::ItemNotFound { vault, item },
            ConnectError::Ambiguous { count, .. } => Self::AmbiguousItem { vault, item, count },
            ConnectError::Cancelled => Self::Cancelled,
            source => Self::ItemLookup { vault, item, source },
        }
    }

    /// Classify a failure to load a full item
    pub fn item_fetch(item: &str, source: ConnectError) -> Self {
        match source {
            ConnectError::Cancelled => Self::Cancelled,
            source => Self::ItemFetchFailed {
                item: item.to_string(),
                source,
            },
        }
    }

    /// The flat kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidRequest(_) => ErrorKind::InvalidRequest,
            Self::MalformedPath { .. } => ErrorKind::MalformedPath,
            Self::VaultNotFound { .. } => ErrorKind::VaultNotFound,
            Self::AmbiguousVault { .. } => ErrorKind::AmbiguousVault,
            Self::ItemNotFound { .. } => ErrorKind::ItemNotFound,
            Self::AmbiguousItem { .. } => ErrorKind::AmbiguousItem,
            Self::VaultLookup { source, .. } | Self::ItemLookup { source, .. } => match source {
                ConnectError::Transport(_) => ErrorKind::Transport,
                ConnectError::Api { .. } | ConnectError::Decode(_) => ErrorKind::StoreApi,
                // Classified by the constructors; only reachable through direct construction
                ConnectError::NotFound(_)
                | ConnectError::Ambiguous { .. }
                | ConnectError::InvalidConfig(_)
                | ConnectError::Cancelled => ErrorKind::StoreApi,
            },
            Self::ItemFetchFailed { .. } => ErrorKind::ItemFetchFailed,
            Self::SectionNotFound { .. } => ErrorKind::SectionNotFound,
            Self::FieldNotFound { .. }
            | Self::FieldNotFoundInSection { .. }
            | Self::NotesNotFound { .. } => ErrorKind::FieldNotFound,
            Self::AmbiguousPassword { .. }
            | Self::AmbiguousField { .. }
            | Self::DuplicateFieldInSection { .. } => ErrorKind::AmbiguousField,
            Self::Cancelled => ErrorKind::Cancelled,
        }
    }

    /// Status and message of the underlying store API error, if any
    pub fn store_status(&self) -> Option<(u16, &str)> {
        match self {
            Self::VaultLookup { source, .. }
            | Self::ItemLookup { source, .. }
            | Self::ItemFetchFailed { source, .. } => match source {
                ConnectError::Api { status, message } => Some((*status, message.as_str())),
                _ => None,
            },
            _ => None,
        }
    }
}

pub type ResolveResult<T> = Result<T, ResolveError>;
