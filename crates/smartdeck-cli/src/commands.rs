//! Subcommand implementations. Each prints its report to stdout; errors
//! bubble up to `main`.

use std::{
  collections::HashMap,
  num::NonZeroUsize,
  path::{Path, PathBuf},
};

use anyhow::Context as _;
use serde_json::json;
use smartdeck_anki::{AnkiConnect, apkg_ident, ingest_apkg, ingest_live, write_package};
use smartdeck_core::{
  coverage::Coverage,
  deck::DeckEntry,
  excerpt::capture_excerpts,
  nlp::{Token, tokenize_lemmas},
  source::kind,
  vault::Vault,
};
use smartdeck_vault::SqliteVault;

/// A book selection with its language resolved.
#[derive(Debug)]
pub struct Book {
  pub path:          PathBuf,
  pub pages:         Option<String>,
  pub virtual_pages: Option<NonZeroUsize>,
  pub lang:          String,
}

impl Book {
  /// Extracted pages and their tokens.
  async fn read(&self) -> anyhow::Result<(Vec<String>, Vec<Token>)> {
    let path = self.path.clone();
    let pages = self.pages.clone();
    let every = self.virtual_pages;
    let lang = self.lang.clone();

    tokio::task::spawn_blocking(move || {
      let pages = smartdeck_extract::extract(&path, pages.as_deref(), every)
        .with_context(|| format!("failed to read {}", path.display()))?;
      let tokens = tokenize_lemmas(&pages, &lang);
      Ok::<_, anyhow::Error>((pages, tokens))
    })
    .await
    .context("extraction task failed")?
  }

  async fn coverage(&self, vault: &SqliteVault, tokens: &[Token]) -> anyhow::Result<Coverage> {
    let lemmas: Vec<String> = tokens.iter().map(|t| t.lemma.clone()).collect();
    vault
      .coverage(&self.lang, &lemmas)
      .await
      .context("failed to measure coverage")
  }
}

// ─── diff ─────────────────────────────────────────────────────────────────────

pub async fn diff(vault: &SqliteVault, book: &Book, top: usize, as_json: bool) -> anyhow::Result<()> {
  let (_, tokens) = book.read().await?;
  let coverage = book.coverage(vault, &tokens).await?;
  // Spelling variants collapse into one row per lowercase lemma.
  let unknown = coverage.unknown.most_common_folded(top);

  if as_json {
    let report = json!({
      "coverage": coverage.ratio,
      "tier":     coverage.tier,
      "tokens":   tokens.len(),
      "unknown":  unknown
        .iter()
        .map(|(lemma, count)| json!({ "lemma": lemma, "count": count }))
        .collect::<Vec<_>>(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    return Ok(());
  }

  println!("Coverage: {:.1}%", coverage.ratio * 100.0);
  println!("Tier: {}", coverage.tier);
  println!();
  println!("Unknown lemmas (top {top}):");
  for (lemma, count) in unknown {
    println!("  {lemma} ({count})");
  }
  Ok(())
}

// ─── build ────────────────────────────────────────────────────────────────────

pub async fn build(vault: &SqliteVault, book: &Book, top: usize, output: &Path) -> anyhow::Result<()> {
  let (pages, tokens) = book.read().await?;
  let coverage = book.coverage(vault, &tokens).await?;
  let lemmas = coverage.unknown.top_lemmas(top);

  // First part of speech seen for each lemma.
  let mut pos: HashMap<String, &str> = HashMap::new();
  for token in &tokens {
    pos
      .entry(token.lemma.to_lowercase())
      .or_insert(token.pos.as_str());
  }

  let occurrences = capture_excerpts(&pages, &lemmas);
  let entries: Vec<DeckEntry> = lemmas
    .iter()
    .map(|lemma| {
      let pos = pos.get(lemma).copied().unwrap_or_default();
      DeckEntry::new(lemma.as_str(), pos, occurrences.get(lemma))
    })
    .collect();

  let deck_name = book
    .path
    .file_name()
    .map(|n| n.to_string_lossy().into_owned())
    .unwrap_or_else(|| "SmartDeck".into());
  let out = output.to_path_buf();
  let count = entries.len();
  tokio::task::spawn_blocking(move || write_package(&deck_name, &entries, &out))
    .await
    .context("deck writer task failed")?
    .with_context(|| format!("failed to write {}", output.display()))?;

  let ident = absolute(&book.path)?;
  vault
    .add_words(&book.lang, &lemmas, kind::BOOK, &ident, &occurrences)
    .await
    .context("failed to record the deck's words")?;

  println!("Deck written to {} ({count} cards)", output.display());
  Ok(())
}

// ─── sync ─────────────────────────────────────────────────────────────────────

pub async fn sync_add_apkg(
  vault: &SqliteVault,
  ident: &str,
  lang: &str,
  top: Option<usize>,
) -> anyhow::Result<()> {
  let path = Path::new(ident);
  let words = ingest_apkg(vault, path, lang, top)
    .await
    .with_context(|| format!("failed to import {}", path.display()))?;

  let name = path.file_name().map_or_else(|| ident.into(), |n| n.to_string_lossy());
  println!("Imported {name} into vault ({words} words).");
  Ok(())
}

pub async fn sync_add_live(vault: &SqliteVault, url: &str, deck: &str, lang: &str) -> anyhow::Result<()> {
  let client = AnkiConnect::new(url).context("failed to build AnkiConnect client")?;
  let words = ingest_live(vault, &client, deck, lang)
    .await
    .with_context(|| format!("failed to import live deck '{deck}' from {url}"))?;

  println!("Imported live deck '{deck}' into vault ({words} words).");
  Ok(())
}

pub async fn sync_remove(vault: &SqliteVault, kind: &str, ident: &str) -> anyhow::Result<()> {
  // File-backed sources are stored under their absolute path.
  let ident = match kind {
    kind::APKG => apkg_ident(Path::new(ident))?,
    kind::BOOK => absolute(Path::new(ident))?,
    _ => ident.to_owned(),
  };

  if vault.remove_source(kind, &ident).await? {
    println!("Removed {kind} '{ident}' and any orphaned words.");
  } else {
    println!("No {kind} source '{ident}' in vault.");
  }
  Ok(())
}

pub async fn sync_list(vault: &SqliteVault) -> anyhow::Result<()> {
  let sources = vault.list_sources().await?;
  if sources.is_empty() {
    println!("No sources.");
    return Ok(());
  }
  for summary in sources {
    println!(
      "{:<5} {:>7}  {}",
      summary.source.kind, summary.word_count, summary.source.ident
    );
  }
  Ok(())
}

fn absolute(path: &Path) -> anyhow::Result<String> {
  let abs = std::path::absolute(path)
    .with_context(|| format!("cannot resolve {}", path.display()))?;
  Ok(abs.to_string_lossy().into_owned())
}
