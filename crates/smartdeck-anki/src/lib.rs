//! Anki interop for SmartDeck.
//!
//! Writes `.apkg` packages from [`DeckEntry`](smartdeck_core::deck::DeckEntry)
//! lists, reads the words back out of existing packages, and talks to a
//! running Anki through the AnkiConnect add-on. The ingestion adapters feed
//! both kinds of deck into any [`Vault`](smartdeck_core::vault::Vault).
//!
//! ```no_run
//! use smartdeck_anki::{read_package_words, write_package};
//! use smartdeck_core::deck::DeckEntry;
//!
//! let entries = vec![DeckEntry::new("hund", "NOUN", None)];
//! write_package("Kafka", &entries, "kafka.apkg".as_ref()).unwrap();
//! assert_eq!(read_package_words("kafka.apkg".as_ref(), None).unwrap(), ["hund"]);
//! ```

pub mod connect;
pub mod error;
mod html;
mod ingest;
mod package;
mod read;

pub use connect::AnkiConnect;
pub use error::{Error, Result};
pub use ingest::{apkg_ident, ingest_apkg, ingest_live};
pub use package::{FIELDS, MODEL_ID, deck_id, write_package};
pub use read::read_package_words;
