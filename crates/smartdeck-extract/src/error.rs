//! Error types for `smartdeck-extract`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("file not found: {}", .0.display())]
  NotFound(PathBuf),

  /// The file exists but could not be parsed as the detected format.
  #[error("cannot read {} as {format}: {message}", path.display())]
  Malformed {
    path:    PathBuf,
    format:  &'static str,
    message: String,
  },

  #[error("page spec error: {0}")]
  PageSpec(#[from] smartdeck_core::Error),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
