//! First-occurrence excerpt capture.

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

use crate::word::{Occurrence, Occurrences};

/// Longest excerpt kept verbatim, in characters.
const MAX_EXCERPT: usize = 120;
/// Context kept before the hit when an excerpt is clipped.
const LEAD: usize = 40;

/// Naive sentence splitter: a run of non-terminators plus its terminators.
/// A trailing unterminated fragment is a sentence too.
static SENTENCE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"[^.!?]+(?:[.!?]+|$)").expect("static regex"));

/// Split `text` into trimmed, non-empty sentences, keeping terminators.
pub fn split_sentences(text: &str) -> Vec<&str> {
  SENTENCE
    .find_iter(text)
    .map(|m| m.as_str().trim())
    .filter(|s| !s.is_empty())
    .collect()
}

/// Find, for each lemma, the first sentence across `pages` that contains it
/// as a whole word (case-insensitive).
///
/// Locations are `"<page>:<sentence>"`, both 1-based. Lemmas that never
/// appear are absent from the result.
pub fn capture_excerpts<P, L>(pages: &[P], lemmas: &[L]) -> Occurrences
where
  P: AsRef<str>,
  L: AsRef<str>,
{
  let mut pending: Vec<(&str, Regex)> = lemmas
    .iter()
    .map(AsRef::as_ref)
    .filter(|l| !l.is_empty())
    .filter_map(|l| word_pattern(l).map(|re| (l, re)))
    .collect();
  let mut found = Occurrences::new();

  for (p_idx, page) in pages.iter().enumerate() {
    for (s_idx, sentence) in split_sentences(page.as_ref()).into_iter().enumerate() {
      pending.retain(|(lemma, re)| {
        let Some(hit) = re.find(sentence) else {
          return true;
        };
        if !found.contains_key(*lemma) {
          let location = format!("{}:{}", p_idx + 1, s_idx + 1);
          found.insert(
            (*lemma).to_owned(),
            Occurrence::new(clip(sentence, hit.start()), location),
          );
        }
        false
      });
      if pending.is_empty() {
        return found;
      }
    }
  }
  found
}

fn word_pattern(lemma: &str) -> Option<Regex> {
  RegexBuilder::new(&format!(r"\b{}\b", regex::escape(lemma)))
    .case_insensitive(true)
    .build()
    .ok()
}

/// Clip `sentence` to a window around the byte offset `hit`.
fn clip(sentence: &str, hit: usize) -> String {
  let chars: Vec<char> = sentence.chars().collect();
  if chars.len() <= MAX_EXCERPT {
    return sentence.to_owned();
  }

  let hit_char = sentence[..hit].chars().count();
  let start = hit_char.saturating_sub(LEAD);
  let end = (start + MAX_EXCERPT).min(chars.len());
  let mut out: String = chars[start..end].iter().collect::<String>().trim().to_owned();
  if !out.ends_with(['.', '!', '?']) {
    out.push('…');
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn finds_first_sentence_per_lemma() {
    let pages = [
      "This is a test. Das Wort Apfel hier.",
      "Noch ein Satz mit Apfel und Birne.",
    ];
    let occ = capture_excerpts(&pages, &["apfel", "birne"]);

    assert_eq!(occ["apfel"].location, "1:2");
    assert_eq!(occ["apfel"].excerpt, "Das Wort Apfel hier.");
    assert_eq!(occ["birne"].location, "2:1");
  }

  #[test]
  fn whole_words_only() {
    let occ = capture_excerpts(&["A catalogue. The cat sat."], &["cat"]);
    assert_eq!(occ["cat"].location, "1:2");
  }

  #[test]
  fn missing_lemmas_are_absent() {
    let occ = capture_excerpts(&["Nothing here."], &["ghost"]);
    assert!(occ.is_empty());
  }

  #[test]
  fn long_sentences_are_clipped_around_the_hit() {
    let long = format!("Lorem {} gegessen Ende.", "a".repeat(200));
    let occ = capture_excerpts(&[long], &["gegessen"]);

    let ex = &occ["gegessen"];
    assert!(ex.excerpt.chars().count() <= MAX_EXCERPT + 1);
    assert!(ex.excerpt.contains("gegessen"));
    assert!(ex.excerpt.ends_with("Ende."));
    assert_eq!(ex.location, "1:1");
  }

  #[test]
  fn clipped_mid_sentence_gets_ellipsis() {
    let long = format!("Start gegessen {} end.", "b".repeat(200));
    let occ = capture_excerpts(&[long], &["gegessen"]);
    assert!(occ["gegessen"].excerpt.starts_with("Start gegessen"));
    assert!(occ["gegessen"].excerpt.ends_with('…'));
  }

  #[test]
  fn trailing_fragment_counts_as_sentence() {
    assert_eq!(split_sentences("One. Two! Three"), vec!["One.", "Two!", "Three"]);
  }
}
