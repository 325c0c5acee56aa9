//! PDF extraction using the `pdf-extract` crate.
//!
//! `pdf-extract` returns the whole document as one string with form feeds
//! (`\x0C`) between pages.

use std::path::Path;

use crate::{Error, Result};

pub(crate) fn raw_pages(path: &Path) -> Result<Vec<String>> {
  let data = std::fs::read(path)?;
  let text = pdf_extract::extract_text_from_mem(&data).map_err(|e| Error::Malformed {
    path:    path.to_path_buf(),
    format:  "pdf",
    message: e.to_string(),
  })?;

  Ok(text.split('\x0C').map(str::to_owned).collect())
}
