//! Page-text extraction for EPUB, PDF and plain-text books.
//!
//! Every extractor yields one string per logical page. A page spec selects
//! pages before anything else happens; virtual pagination, when requested,
//! then regroups the selected text into fixed-size word windows.
//!
//! ```no_run
//! use smartdeck_extract::extract;
//!
//! let pages = extract("novel.epub".as_ref(), Some("1-3"), None).unwrap();
//! println!("{} pages", pages.len());
//! ```

mod epub;
mod pdf;
mod text;

pub mod error;

use std::{num::NonZeroUsize, path::Path};

pub use error::{Error, Result};
use smartdeck_core::pagespec::{parse_pagespec, virtual_split};

/// Document formats recognised by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
  Epub,
  Pdf,
  PlainText,
}

impl Format {
  /// Detect the format from `path`'s extension. Unrecognised extensions are
  /// treated as PDF.
  pub fn detect(path: &Path) -> Self {
    let ext = path
      .extension()
      .map(|e| e.to_string_lossy().to_lowercase())
      .unwrap_or_default();
    match ext.as_str() {
      "epub" => Self::Epub,
      "txt" | "text" | "md" => Self::PlainText,
      _ => Self::Pdf,
    }
  }
}

/// Extract the pages of the document at `path`.
///
/// - `pages`: a page spec such as `"1-3,5"` (1-based); `None` keeps all.
/// - `virtual_pages`: if set, join the selected pages and re-split them every
///   `n` words.
pub fn extract(
  path: &Path,
  pages: Option<&str>,
  virtual_pages: Option<NonZeroUsize>,
) -> Result<Vec<String>> {
  if !path.is_file() {
    return Err(Error::NotFound(path.to_path_buf()));
  }

  let format = Format::detect(path);
  let raw = match format {
    Format::Epub => epub::raw_pages(path)?,
    Format::Pdf => pdf::raw_pages(path)?,
    Format::PlainText => text::raw_pages(path)?,
  };
  tracing::debug!(?format, path = %path.display(), pages = raw.len(), "extracted raw pages");

  let selected = select(raw, pages, format != Format::Epub)?;

  Ok(match virtual_pages {
    Some(every) => virtual_split(&selected.join(" "), every),
    None => selected,
  })
}

/// Apply the page spec to `raw`. When `drop_blank` is set, pages that are
/// empty after trimming are discarded (they carry nothing to read).
fn select(raw: Vec<String>, pages: Option<&str>, drop_blank: bool) -> Result<Vec<String>> {
  let wanted = parse_pagespec(pages, Some(raw.len()))?;
  let mut raw: Vec<Option<String>> = raw.into_iter().map(Some).collect();

  Ok(
    wanted
      .into_iter()
      .filter_map(|i| raw.get_mut(i).and_then(Option::take))
      .map(|page| if drop_blank { page.trim().to_owned() } else { page })
      .filter(|page| !drop_blank || !page.is_empty())
      .collect(),
  )
}
