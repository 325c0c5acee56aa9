//! Error types for `smartdeck-core`.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
  /// A page-spec token that is neither `N` nor `N-M` with `N >= 1`.
  #[error("bad page token: {0:?}")]
  BadPageToken(String),

  #[error("descending page range: {0:?}")]
  DescendingRange(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
