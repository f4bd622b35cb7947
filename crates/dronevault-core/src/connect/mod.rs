//! Secret store access
//!
//! This module provides read-only access to a vault/item/field store with:
//! - `SecretBackend` trait the resolver is written against
//! - `ConnectClient`: the REST implementation (bearer auth, JSON, filter queries)
//! - `MemoryBackend`: in-memory implementation for tests

mod traits;
mod error;
mod client;
mod memory;
pub mod query;

pub use traits::SecretBackend;
pub use error::{ConnectError, ConnectResult};
pub use client::ConnectClient;
pub use memory::MemoryBackend;
