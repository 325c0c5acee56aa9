//! The flashcard record handed to package writers.

use serde::{Deserialize, Serialize};

use crate::word::Occurrence;

/// One flashcard. Enrichment fields that no lookup has filled stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckEntry {
  pub lemma:                String,
  pub pos:                  String,
  pub translation:          Option<String>,
  pub ipa:                  Option<String>,
  /// Example sentence; empty when none was captured.
  pub excerpt:              String,
  pub sentence_translation: Option<String>,
  pub location:             String,
}

impl DeckEntry {
  /// An entry carrying only what the local pipeline knows.
  pub fn new(lemma: impl Into<String>, pos: impl Into<String>, occurrence: Option<&Occurrence>) -> Self {
    let (excerpt, location) = occurrence
      .map(|o| (o.excerpt.clone(), o.location.clone()))
      .unwrap_or_default();
    Self {
      lemma: lemma.into(),
      pos: pos.into(),
      excerpt,
      location,
      ..Self::default()
    }
  }
}
