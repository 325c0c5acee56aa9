//! Error type for `smartdeck-vault`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(tokio_rusqlite::Error),

  /// A write broke a uniqueness or foreign-key constraint. Insert-if-absent
  /// semantics make this unreachable in normal operation.
  #[error("store integrity violation: {0}")]
  IntegrityViolation(String),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("no user configuration directory; set {} to choose a vault path", crate::VAULT_ENV)]
  NoConfigDir,
}

impl From<tokio_rusqlite::Error> for Error {
  fn from(err: tokio_rusqlite::Error) -> Self {
    if let tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(code, msg)) = &err
      && code.code == rusqlite::ErrorCode::ConstraintViolation
    {
      return Self::IntegrityViolation(msg.clone().unwrap_or_else(|| code.to_string()));
    }
    Self::Database(err)
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
