//! Sources: the provenance records that own known words.
//!
//! A source is identified by its `(kind, ident)` pair. The same ident under
//! two different kinds names two unrelated sources.

use serde::{Deserialize, Serialize};

/// Well-known source kinds. The set is open: the vault accepts any tag.
pub mod kind {
  /// A flashcard deck registered by name.
  pub const DECK: &str = "deck";
  /// A plain file on disk.
  pub const FILE: &str = "file";
  /// An imported Anki `.apkg` package.
  pub const APKG: &str = "apkg";
  /// A deck read live from a running Anki instance.
  pub const LIVE: &str = "live";
  /// A book the learner has already built a deck from.
  pub const BOOK: &str = "book";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
  pub id:    i64,
  pub kind:  String,
  pub ident: String,
}

/// A source together with the number of words it currently links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSummary {
  pub source:     Source,
  pub word_count: u64,
}
