//! Core types shared by the store client and the resolver

mod item;
mod request;
mod cancellation;

pub use item::{Vault, ItemSummary, Item, Field, Section, SectionRef};
pub use request::{SecretRequest, SecretValue};
pub use cancellation::CancellationToken;
