//! Dronevault Core
//!
//! Resolves CI secret requests against a vault/item/field secret store.
//! A request carries a path such as `Production Vault/Database Credentials/username`;
//! the resolver finds the vault, then the item, loads it, and selects exactly
//! one field value. Anything other than a single unambiguous match is an error.
//!
//! ```rust,ignore
//! use dronevault_core::{ConnectConfig, SecretResolver, SecretRequest, CancellationToken, NoOpLogger};
//!
//! let config = ConnectConfig::new("https://connect.example.com", token);
//! let resolver = SecretResolver::connect(&config, Arc::new(NoOpLogger))?;
//!
//! let request = SecretRequest::new("db_password", "Production Vault/Database Credentials");
//! let secret = resolver.resolve(Some(&request), &CancellationToken::new()).await?;
//! ```

pub mod types;
pub mod logging;
pub mod config;
pub mod matching;
pub mod connect;
pub mod resolver;

// Re-export commonly used types
pub use types::{
    Vault, ItemSummary, Item, Field, Section, SectionRef,
    SecretRequest, SecretValue,
    CancellationToken,
};

pub use logging::{Logger, NoOpLogger, SharedLogger};

pub use config::{ConnectConfig, ConfigError};

pub use connect::{SecretBackend, ConnectClient, MemoryBackend, ConnectError, ConnectResult};

pub use resolver::{
    SecretResolver, ResolveError, ResolveResult, ErrorKind,
    SecretPath, parse_path, select_field,
};
