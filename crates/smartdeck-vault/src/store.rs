//! [`SqliteVault`], the SQLite implementation of [`Vault`].

use std::{collections::HashSet, path::Path, time::Duration};

use rusqlite::{OptionalExtension as _, TransactionBehavior};

use smartdeck_core::{
  coverage::Coverage,
  source::{Source, SourceSummary},
  vault::Vault,
  word::{KnownWord, Occurrence, Occurrences},
};

use crate::{
  Result,
  location,
  schema::{PRAGMAS, SCHEMA},
};

/// How long a writer waits for another process's write lock.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

// ─── Store ───────────────────────────────────────────────────────────────────

/// A known-word vault backed by a single SQLite file.
///
/// Cloning is cheap. The inner connection is reference-counted, and every
/// clone shares the one connection thread, so a process's writes serialize.
#[derive(Clone)]
pub struct SqliteVault {
  conn: tokio_rusqlite::Connection,
}

impl SqliteVault {
  /// Open (or create) a vault at `path`, creating parent directories.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
      std::fs::create_dir_all(parent)?;
    }
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let vault = Self { conn };
    vault.init_schema().await?;
    Ok(vault)
  }

  /// Open the vault at [`default_path`](crate::default_path).
  pub async fn open_default() -> Result<Self> { Self::open(location::default_path()?).await }

  /// Open an in-memory vault, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let vault = Self { conn };
    vault.init_schema().await?;
    Ok(vault)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch(PRAGMAS)?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run raw SQL against the connection, e.g. to install a failing trigger.
  #[cfg(test)]
  pub(crate) async fn execute_batch(&self, sql: &'static str) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute_batch(sql)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

/// Insert-if-absent the `(kind, ident)` source and return its id.
fn upsert_source(conn: &rusqlite::Connection, kind: &str, ident: &str) -> rusqlite::Result<i64> {
  conn.execute(
    "INSERT OR IGNORE INTO sources (kind, ident) VALUES (?1, ?2)",
    rusqlite::params![kind, ident],
  )?;
  conn.query_row(
    "SELECT id FROM sources WHERE kind = ?1 AND ident = ?2",
    rusqlite::params![kind, ident],
    |row| row.get(0),
  )
}

// ─── Vault impl ──────────────────────────────────────────────────────────────

impl Vault for SqliteVault {
  type Error = crate::Error;

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn get_or_create_source(&self, kind: &str, ident: &str) -> Result<i64> {
    let kind  = kind.to_owned();
    let ident = ident.to_owned();

    let id = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let id = upsert_source(&tx, &kind, &ident)?;
        tx.commit()?;
        Ok(id)
      })
      .await?;
    Ok(id)
  }

  async fn add_words(
    &self,
    lang:        &str,
    lemmas:      &[String],
    kind:        &str,
    ident:       &str,
    occurrences: &Occurrences,
  ) -> Result<()> {
    let mut seen = HashSet::new();
    let batch: Vec<(String, Option<Occurrence>)> = lemmas
      .iter()
      .filter(|lemma| seen.insert(lemma.as_str()))
      .map(|lemma| (lemma.clone(), occurrences.get(lemma).cloned()))
      .collect();

    let lang  = lang.to_owned();
    let kind  = kind.to_owned();
    let ident = ident.to_owned();

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let source_id = upsert_source(&tx, &kind, &ident)?;

        {
          let mut insert_word = tx.prepare_cached(
            "INSERT OR IGNORE INTO known_words (lang, lemma) VALUES (?1, ?2)",
          )?;
          let mut find_word = tx.prepare_cached(
            "SELECT id FROM known_words WHERE lang = ?1 AND lemma = ?2",
          )?;
          let mut link = tx.prepare_cached(
            "INSERT OR IGNORE INTO word_sources (word_id, source_id) VALUES (?1, ?2)",
          )?;
          // OR IGNORE on the word_id primary key: the first excerpt wins.
          let mut insert_occurrence = tx.prepare_cached(
            "INSERT OR IGNORE INTO occurrences (word_id, excerpt, location) VALUES (?1, ?2, ?3)",
          )?;

          for (lemma, occurrence) in &batch {
            insert_word.execute(rusqlite::params![lang, lemma])?;
            let word_id: i64 =
              find_word.query_row(rusqlite::params![lang, lemma], |row| row.get(0))?;
            link.execute(rusqlite::params![word_id, source_id])?;
            if let Some(occ) = occurrence {
              insert_occurrence.execute(rusqlite::params![word_id, occ.excerpt, occ.location])?;
            }
          }
        }

        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn remove_source(&self, kind: &str, ident: &str) -> Result<bool> {
    let kind  = kind.to_owned();
    let ident = ident.to_owned();

    let removed = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let source_id: Option<i64> = tx
          .query_row(
            "SELECT id FROM sources WHERE kind = ?1 AND ident = ?2",
            rusqlite::params![kind, ident],
            |row| row.get(0),
          )
          .optional()?;
        let Some(source_id) = source_id else {
          return Ok(false);
        };

        // Links first: orphan detection must see the post-removal state.
        tx.execute("DELETE FROM word_sources WHERE source_id = ?1", [source_id])?;
        tx.execute(
          "DELETE FROM known_words
           WHERE NOT EXISTS (
             SELECT 1 FROM word_sources ws WHERE ws.word_id = known_words.id
           )",
          [],
        )?;
        tx.execute(
          "DELETE FROM occurrences
           WHERE NOT EXISTS (
             SELECT 1 FROM known_words kw WHERE kw.id = occurrences.word_id
           )",
          [],
        )?;
        tx.execute("DELETE FROM sources WHERE id = ?1", [source_id])?;

        tx.commit()?;
        Ok(true)
      })
      .await?;
    Ok(removed)
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn coverage(&self, lang: &str, lemmas: &[String]) -> Result<Coverage> {
    let lang = lang.to_owned();

    let known: HashSet<String> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare_cached("SELECT lemma FROM known_words WHERE lang = ?1")?;
        let rows = stmt
          .query_map([lang], |row| row.get::<_, String>(0))?
          .map(|lemma| lemma.map(|l| l.to_lowercase()))
          .collect::<rusqlite::Result<HashSet<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(Coverage::measure(&known, lemmas))
  }

  async fn list_sources(&self) -> Result<Vec<SourceSummary>> {
    let sources = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT s.id, s.kind, s.ident, COUNT(ws.word_id)
           FROM sources s
           LEFT JOIN word_sources ws ON ws.source_id = s.id
           GROUP BY s.id
           ORDER BY s.kind, s.ident",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(SourceSummary {
              source:     Source {
                id:    row.get(0)?,
                kind:  row.get(1)?,
                ident: row.get(2)?,
              },
              word_count: row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(sources)
  }

  async fn known_words(&self, lang: &str) -> Result<Vec<KnownWord>> {
    let lang = lang.to_owned();

    let words = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, lang, lemma FROM known_words WHERE lang = ?1 ORDER BY lemma",
        )?;
        let rows = stmt
          .query_map([lang], |row| {
            Ok(KnownWord {
              id:    row.get(0)?,
              lang:  row.get(1)?,
              lemma: row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(words)
  }

  async fn occurrence(&self, lang: &str, lemma: &str) -> Result<Option<Occurrence>> {
    let lang  = lang.to_owned();
    let lemma = lemma.to_owned();

    let occurrence = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT o.excerpt, o.location
               FROM occurrences o
               JOIN known_words w ON w.id = o.word_id
               WHERE w.lang = ?1 AND w.lemma = ?2",
              rusqlite::params![lang, lemma],
              |row| Ok(Occurrence { excerpt: row.get(0)?, location: row.get(1)? }),
            )
            .optional()?,
        )
      })
      .await?;
    Ok(occurrence)
  }
}
