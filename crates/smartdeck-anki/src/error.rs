//! Error types for `smartdeck-anki`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("file not found: {}", .0.display())]
  NotFound(PathBuf),

  /// Not a zip archive, no collection inside, or unreadable notes.
  #[error("not a usable Anki package: {}: {message}", path.display())]
  Malformed { path: PathBuf, message: String },

  #[error("AnkiConnect error: {0}")]
  AnkiConnect(String),

  #[error("vault error: {0}")]
  Vault(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("database error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  #[error("archive error: {0}")]
  Zip(#[from] zip::result::ZipError),

  #[error("HTTP error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("JSON error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("background task failed: {0}")]
  Task(#[from] tokio::task::JoinError),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

impl Error {
  pub(crate) fn vault(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Vault(Box::new(e))
  }

  pub(crate) fn malformed(path: impl Into<PathBuf>, message: impl ToString) -> Self {
    Self::Malformed {
      path:    path.into(),
      message: message.to_string(),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
