//! Known words and their first-seen occurrences.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A lemma the learner knows in one language. `(lang, lemma)` is unique.
///
/// Lemma casing is whatever the caller stored; the vault does not normalise
/// it on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownWord {
  pub id:    i64,
  pub lang:  String,
  pub lemma: String,
}

/// The first example sentence captured for a word, and where it was found
/// (e.g. `"12:3"` for page 12, sentence 3).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
  pub excerpt:  String,
  pub location: String,
}

impl Occurrence {
  pub fn new(excerpt: impl Into<String>, location: impl Into<String>) -> Self {
    Self { excerpt: excerpt.into(), location: location.into() }
  }
}

/// Occurrences keyed by lemma, as produced by
/// [`capture_excerpts`](crate::excerpt::capture_excerpts).
pub type Occurrences = HashMap<String, Occurrence>;
