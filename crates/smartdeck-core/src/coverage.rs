//! Lexical coverage of a token stream against the known-word set.
//!
//! Coverage is measured per token occurrence, not per distinct lemma: a
//! document that repeats one unknown word fifty times is harder to read than
//! one that uses it once, even though the vault would only ever store it once.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use strum::{Display, EnumString, IntoStaticStr};

// ─── Tier ────────────────────────────────────────────────────────────────────

/// Reading-difficulty band derived from the coverage ratio.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, IntoStaticStr, Serialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tier {
  /// `ratio >= 0.98`
  Easy,
  /// `ratio >= 0.95`
  Adequate,
  /// `ratio >= 0.90`
  Challenging,
  Frustrating,
}

impl Tier {
  pub fn from_ratio(ratio: f64) -> Self {
    if ratio >= 0.98 {
      Self::Easy
    } else if ratio >= 0.95 {
      Self::Adequate
    } else if ratio >= 0.90 {
      Self::Challenging
    } else {
      Self::Frustrating
    }
  }
}

// ─── Unknown multiset ────────────────────────────────────────────────────────

/// A counted multiset of unknown words that remembers first-seen order, so
/// ties in [`most_common`](Self::most_common) come out in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct UnknownWords {
  entries: Vec<(String, u64)>,
  #[serde(skip)]
  index:   HashMap<String, usize>,
}

impl UnknownWords {
  pub fn new() -> Self { Self::default() }

  /// Count one occurrence of `word`.
  pub fn add(&mut self, word: &str) {
    match self.index.get(word) {
      Some(&i) => self.entries[i].1 += 1,
      None => {
        self.index.insert(word.to_owned(), self.entries.len());
        self.entries.push((word.to_owned(), 1));
      }
    }
  }

  /// Number of times `word` was counted; zero when absent.
  pub fn count(&self, word: &str) -> u64 {
    self.index.get(word).map_or(0, |&i| self.entries[i].1)
  }

  /// Number of distinct spellings in the multiset.
  pub fn len(&self) -> usize { self.entries.len() }

  pub fn is_empty(&self) -> bool { self.entries.is_empty() }

  /// Sum of all counts.
  pub fn total(&self) -> u64 { self.entries.iter().map(|(_, n)| n).sum() }

  pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
    self.entries.iter().map(|(w, n)| (w.as_str(), *n))
  }

  /// The `n` highest counts, highest first; ties keep first-seen order.
  pub fn most_common(&self, n: usize) -> Vec<(&str, u64)> {
    let mut ranked: Vec<(&str, u64)> = self.iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(n);
    ranked
  }

  /// The `n` highest counts after folding case, highest first; ties keep
  /// first-seen order.
  ///
  /// Every miss was counted under its lowercase form, so the folded count of
  /// a word is simply the count of that form: `Dog` and `dog` together
  /// report as one `dog` row with the number of occurrences.
  pub fn most_common_folded(&self, n: usize) -> Vec<(String, u64)> {
    let mut seen = HashSet::new();
    let mut ranked: Vec<(String, u64)> = self
      .entries
      .iter()
      .map(|(word, _)| word.to_lowercase())
      .filter(|lower| seen.insert(lower.clone()))
      .map(|lower| {
        let count = self.count(&lower);
        (lower, count)
      })
      .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(n);
    ranked
  }

  /// Up to `n` distinct lowercase lemmas ranked by folded count. This is
  /// the form that gets stored in the vault.
  pub fn top_lemmas(&self, n: usize) -> Vec<String> {
    self.most_common_folded(n).into_iter().map(|(w, _)| w).collect()
  }
}

// ─── Coverage ────────────────────────────────────────────────────────────────

/// The result of [`Vault::coverage`](crate::vault::Vault::coverage).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Coverage {
  /// Fraction of candidate tokens that are known, in `0.0..=1.0`.
  pub ratio:   f64,
  /// Every unknown token in its original case, plus its lowercase form when
  /// that differs.
  pub unknown: UnknownWords,
  pub tier:    Tier,
}

impl Coverage {
  /// Measure `lemmas` against `known`, which must hold lowercase lemmas.
  ///
  /// An empty stream has ratio `1.0`: nothing in it is unknown.
  pub fn measure<I, S>(known: &HashSet<String>, lemmas: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let mut unknown = UnknownWords::new();
    let mut total = 0u64;
    let mut misses = 0u64;

    for lemma in lemmas {
      let lemma = lemma.as_ref();
      total += 1;
      let lower = lemma.to_lowercase();
      if known.contains(&lower) {
        continue;
      }
      misses += 1;
      unknown.add(lemma);
      if lower != lemma {
        unknown.add(&lower);
      }
    }

    let ratio = 1.0 - misses as f64 / total.max(1) as f64;
    Self { ratio, unknown, tier: Tier::from_ratio(ratio) }
  }
}
