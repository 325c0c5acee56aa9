//! SQLite backend for the SmartDeck known-word vault.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated
//! connection thread without blocking the async runtime. Each public
//! operation is a single IMMEDIATE transaction.

mod location;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use location::{VAULT_ENV, default_path, expand_tilde, resolve_path};
pub use store::SqliteVault;

#[cfg(test)]
mod tests;
