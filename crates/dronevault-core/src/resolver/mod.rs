//! Secret resolution engine
//!
//! Turns a `vault/item[/field]` path into exactly one secret value:
//! - `path`: splits and trims the path
//! - `selector`: picks one field of a loaded item
//! - `engine`: drives the vault → item → field lookups against a backend

mod error;
mod path;
mod selector;
mod engine;

pub use error::{ErrorKind, ResolveError, ResolveResult};
pub use path::{parse_path, SecretPath};
pub use selector::{select_field, Selector};
pub use engine::SecretResolver;
