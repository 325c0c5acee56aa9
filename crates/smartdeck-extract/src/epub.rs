//! EPUB extraction using the `epub` crate.
//!
//! Each spine item becomes one page; its XHTML is stripped to text with
//! `scraper`.

use std::path::Path;

use ::epub::doc::EpubDoc;
use scraper::{Html, Selector};

use crate::{Error, Result};

/// One entry per spine item, in reading order. Items that cannot be read
/// yield an empty page so spine indices stay aligned with page specs.
pub(crate) fn raw_pages(path: &Path) -> Result<Vec<String>> {
  let mut doc = EpubDoc::new(path).map_err(|e| Error::Malformed {
    path:    path.to_path_buf(),
    format:  "epub",
    message: e.to_string(),
  })?;

  let chapters = doc.get_num_chapters();
  let mut pages = Vec::with_capacity(chapters);

  for idx in 0..chapters {
    doc.set_current_chapter(idx);
    let page = match doc.get_current_str() {
      Some((content, _mime)) => html_to_text(&content),
      None => {
        tracing::warn!(chapter = idx + 1, path = %path.display(), "unreadable spine item");
        String::new()
      }
    };
    pages.push(page);
  }

  Ok(pages)
}

/// Visible text of an (X)HTML document: text nodes trimmed and joined by
/// single spaces.
pub(crate) fn html_to_text(html: &str) -> String {
  let doc = Html::parse_document(html);
  let body = Selector::parse("body").ok().and_then(|sel| doc.select(&sel).next());
  let pieces: Vec<&str> = match body {
    Some(body) => body.text().collect(),
    None => doc.root_element().text().collect(),
  };
  pieces
    .into_iter()
    .map(str::trim)
    .filter(|t| !t.is_empty())
    .collect::<Vec<_>>()
    .join(" ")
}
