//! Core types and trait definitions for SmartDeck.
//!
//! This crate is deliberately free of database, archive and HTTP
//! dependencies. It holds the known-word [`Vault`](vault::Vault) abstraction,
//! the coverage arithmetic, and the small pure text utilities (page specs,
//! tokenisation, excerpt capture) that the pipeline threads between the
//! extractors and the vault.

// We intentionally use native `async fn` in traits.
#![allow(async_fn_in_trait)]

pub mod coverage;
pub mod deck;
pub mod error;
pub mod excerpt;
pub mod nlp;
pub mod pagespec;
pub mod source;
pub mod vault;
pub mod word;

pub use error::{Error, Result};
