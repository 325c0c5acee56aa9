//! HTML helpers for note fields.

use regex::{Regex, RegexBuilder};
use scraper::Html;

/// Escape `&`, `<`, `>` and `"` for inclusion in a note field.
pub(crate) fn escape(text: &str) -> String {
  let mut out = String::with_capacity(text.len());
  for c in text.chars() {
    match c {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      c => out.push(c),
    }
  }
  out
}

/// Escape `excerpt` and wrap every whole-word, case-insensitive hit of
/// `lemma` in `<span class="h">`.
pub(crate) fn highlight(excerpt: &str, lemma: &str) -> String {
  let Some(re) = word_regex(lemma) else {
    return escape(excerpt);
  };

  let mut out = String::with_capacity(excerpt.len() + 32);
  let mut last = 0;
  for m in re.find_iter(excerpt) {
    out.push_str(&escape(&excerpt[last..m.start()]));
    out.push_str(r#"<span class="h">"#);
    out.push_str(&escape(m.as_str()));
    out.push_str("</span>");
    last = m.end();
  }
  out.push_str(&escape(&excerpt[last..]));
  out
}

/// The Excerpt field: highlighted sentence followed by its location in
/// small print. Empty when no excerpt was captured.
pub(crate) fn excerpt_field(excerpt: &str, lemma: &str, location: &str) -> String {
  if excerpt.is_empty() {
    return String::new();
  }
  let body = highlight(excerpt, lemma);
  if location.is_empty() {
    body
  } else {
    format!("{body} <small>({})</small>", escape(location))
  }
}

/// Visible text of an HTML fragment, whitespace-collapsed.
pub(crate) fn strip(html: &str) -> String {
  let frag = Html::parse_fragment(html);
  frag
    .root_element()
    .text()
    .flat_map(str::split_whitespace)
    .collect::<Vec<_>>()
    .join(" ")
}

fn word_regex(lemma: &str) -> Option<Regex> {
  if lemma.trim().is_empty() {
    return None;
  }
  RegexBuilder::new(&format!(r"\b{}\b", regex::escape(lemma)))
    .case_insensitive(true)
    .build()
    .ok()
}
