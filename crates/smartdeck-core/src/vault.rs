//! The `Vault` trait: the persistent known-word store.
//!
//! The trait is implemented by storage backends (e.g. `smartdeck-vault`).
//! Ingestion adapters and the CLI depend on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use crate::{
  coverage::Coverage,
  source::SourceSummary,
  word::{KnownWord, Occurrence, Occurrences},
};

/// Abstraction over a known-word vault.
///
/// Words are owned by sources through a many-to-many link. A word exists
/// exactly as long as at least one source links it; removing a source sweeps
/// the words it orphaned. Every method is one unit of work: its writes are
/// either all visible or, on failure, none are.
pub trait Vault: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Return the id of the `(kind, ident)` source, creating it if absent.
  /// Idempotent: repeated calls return the same id.
  fn get_or_create_source<'a>(
    &'a self,
    kind: &'a str,
    ident: &'a str,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + 'a;

  /// Add `lemmas` (duplicates collapse) under the `(kind, ident)` source.
  ///
  /// For each distinct lemma: insert the `(lang, lemma)` word if absent, link
  /// it to the source if not already linked, and store its entry from
  /// `occurrences` unless the word already has one (first write wins).
  fn add_words<'a>(
    &'a self,
    lang: &'a str,
    lemmas: &'a [String],
    kind: &'a str,
    ident: &'a str,
    occurrences: &'a Occurrences,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Remove the `(kind, ident)` source, every link it owned, and every word
  /// (with its occurrence) left without any link.
  ///
  /// Returns `false` when no such source existed; that is not an error.
  fn remove_source<'a>(
    &'a self,
    kind: &'a str,
    ident: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Measure a token stream against the words known for `lang`.
  /// Membership is case-insensitive.
  fn coverage<'a>(
    &'a self,
    lang: &'a str,
    lemmas: &'a [String],
  ) -> impl Future<Output = Result<Coverage, Self::Error>> + Send + 'a;

  /// All sources with their linked word counts, ordered by kind then ident.
  fn list_sources(
    &self,
  ) -> impl Future<Output = Result<Vec<SourceSummary>, Self::Error>> + Send + '_;

  /// All words stored for `lang`, ordered by lemma.
  fn known_words<'a>(
    &'a self,
    lang: &'a str,
  ) -> impl Future<Output = Result<Vec<KnownWord>, Self::Error>> + Send + 'a;

  /// The stored first occurrence of `(lang, lemma)`, if any.
  fn occurrence<'a>(
    &'a self,
    lang: &'a str,
    lemma: &'a str,
  ) -> impl Future<Output = Result<Option<Occurrence>, Self::Error>> + Send + 'a;
}
