//! Page specifications (`"1-3,7"`) and virtual pagination.

use std::{collections::BTreeSet, num::NonZeroUsize};

use crate::{Error, Result};

/// Parse a 1-based page spec into sorted, distinct zero-based indices.
///
/// `None` selects every page in `0..total` (nothing when `total` is
/// unknown). Blank tokens are skipped. Pages at or beyond `total` are
/// dropped.
pub fn parse_pagespec(spec: Option<&str>, total: Option<usize>) -> Result<Vec<usize>> {
  let Some(spec) = spec else {
    return Ok((0..total.unwrap_or(0)).collect());
  };

  let mut pages = BTreeSet::new();
  for token in spec.split(',').map(str::trim).filter(|t| !t.is_empty()) {
    let (start, end) = parse_range(token)?;
    if end < start {
      return Err(Error::DescendingRange(token.to_owned()));
    }
    // Only pages below `total` are ever materialised.
    let end = total.map_or(end, |t| end.min(t));
    if start <= end {
      pages.extend(start - 1..end);
    }
  }

  Ok(pages.into_iter().collect())
}

fn parse_range(token: &str) -> Result<(usize, usize)> {
  let bad = || Error::BadPageToken(token.to_owned());
  let page = |s: &str| -> Result<usize> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
      return Err(bad());
    }
    match s.parse::<usize>() {
      Ok(n) if n >= 1 => Ok(n),
      _ => Err(bad()),
    }
  };

  match token.split_once('-') {
    Some((a, b)) => Ok((page(a)?, page(b)?)),
    None => {
      let n = page(token)?;
      Ok((n, n))
    }
  }
}

/// Regroup the words of `text` into pseudo-pages of `every` words each.
/// The last page may be shorter.
pub fn virtual_split(text: &str, every: NonZeroUsize) -> Vec<String> {
  let words: Vec<&str> = text.split_whitespace().collect();
  words.chunks(every.get()).map(|chunk| chunk.join(" ")).collect()
}
