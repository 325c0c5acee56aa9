//! Ingestion adapters: fill the vault from existing Anki decks.
//!
//! Deck words are stored as they appear on the card front; no lemmatisation
//! is applied.

use std::path::Path;

use smartdeck_core::{source::kind, vault::Vault, word::Occurrences};

use crate::{
  Error, Result,
  connect::{AnkiConnect, NoteInfo},
  html,
  read::read_package_words,
};

/// Add the words of the `.apkg` at `path` to `vault` under an `apkg` source
/// whose ident is the package's absolute path. Returns how many words were
/// read.
///
/// The package is read completely before the vault is touched, so a
/// malformed package leaves the vault as it was. A package without words
/// still registers its source.
pub async fn ingest_apkg<V: Vault>(
  vault: &V,
  path: &Path,
  lang: &str,
  top: Option<usize>,
) -> Result<usize> {
  let ident = apkg_ident(path)?;

  let owned = path.to_path_buf();
  let words = tokio::task::spawn_blocking(move || read_package_words(&owned, top)).await??;

  store(vault, lang, &words, kind::APKG, &ident).await?;
  tracing::info!(words = words.len(), source = %ident, "ingested package");
  Ok(words.len())
}

/// Add the front-field words of every note in the live Anki deck `deck` to
/// `vault` under a `live` source named after the deck. Returns how many
/// words were read.
pub async fn ingest_live<V: Vault>(
  vault: &V,
  client: &AnkiConnect,
  deck: &str,
  lang: &str,
) -> Result<usize> {
  let ids = client.find_notes(deck).await?;
  let notes = client.notes_info(&ids).await?;
  let words = live_words(&notes);

  store(vault, lang, &words, kind::LIVE, deck).await?;
  tracing::info!(words = words.len(), deck, "ingested live deck");
  Ok(words.len())
}

/// The identifier an `.apkg` source is stored under. Used for both adding
/// and removing, so the two always agree for a given path.
pub fn apkg_ident(path: &Path) -> Result<String> {
  Ok(std::path::absolute(path)?.to_string_lossy().into_owned())
}

fn live_words(notes: &[NoteInfo]) -> Vec<String> {
  notes
    .iter()
    .filter_map(NoteInfo::first_field)
    .map(html::strip)
    .filter(|w| !w.is_empty())
    .collect()
}

async fn store<V: Vault>(vault: &V, lang: &str, words: &[String], kind: &str, ident: &str) -> Result<()> {
  if words.is_empty() {
    vault.get_or_create_source(kind, ident).await.map_err(Error::vault)?;
  } else {
    vault
      .add_words(lang, words, kind, ident, &Occurrences::new())
      .await
      .map_err(Error::vault)?;
  }
  Ok(())
}
