//! Plain-text books: form feeds separate pages.

use std::path::Path;

use crate::Result;

pub(crate) fn raw_pages(path: &Path) -> Result<Vec<String>> {
  let text = std::fs::read_to_string(path)?;
  Ok(text.split('\x0C').map(str::to_owned).collect())
}
