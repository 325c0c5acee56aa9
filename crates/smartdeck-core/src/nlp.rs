//! Tokenisation and lemmatisation.
//!
//! Lemmatisers can be expensive to build (statistical models, dictionaries),
//! so they live in one explicit process-wide cache keyed by language tag:
//! built on first use, reused until the process exits, replaceable per
//! language with [`register_lemmatizer`].

use std::{
  collections::HashMap,
  sync::{Arc, LazyLock, RwLock},
};

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Universal POS tag for "other / unknown".
pub const POS_UNKNOWN: &str = "X";

/// One lemmatised token of running text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
  /// Normalised (lowercase) lemma.
  pub lemma: String,
  /// Part-of-speech tag.
  pub pos:   String,
}

/// Turns running text into a stream of lemmatised tokens.
pub trait Lemmatizer: Send + Sync {
  fn lemmatize(&self, text: &str) -> Vec<Token>;
}

// ─── Built-in lemmatiser ─────────────────────────────────────────────────────

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\p{L}+").expect("static regex"));

/// Keeps letter-only tokens and lowercases them. It does no morphological
/// analysis, so inflected forms count as distinct lemmas.
#[derive(Debug, Default, Clone, Copy)]
pub struct LetterLemmatizer;

impl Lemmatizer for LetterLemmatizer {
  fn lemmatize(&self, text: &str) -> Vec<Token> {
    WORD
      .find_iter(text)
      .map(|m| Token { lemma: m.as_str().to_lowercase(), pos: POS_UNKNOWN.to_owned() })
      .collect()
  }
}

// ─── Process-wide cache ──────────────────────────────────────────────────────

type Cache = RwLock<HashMap<String, Arc<dyn Lemmatizer>>>;

static CACHE: LazyLock<Cache> = LazyLock::new(Default::default);

fn cache_key(lang: &str) -> String { lang.trim().to_lowercase() }

/// The cached lemmatiser for `lang`, building the default one on first use.
pub fn lemmatizer(lang: &str) -> Arc<dyn Lemmatizer> {
  let key = cache_key(lang);
  if let Some(hit) = CACHE.read().ok().and_then(|m| m.get(&key).cloned()) {
    return hit;
  }

  let built: Arc<dyn Lemmatizer> = Arc::new(LetterLemmatizer);
  match CACHE.write() {
    Ok(mut map) => map.entry(key).or_insert(built).clone(),
    // A poisoned cache only loses memoisation.
    Err(_) => built,
  }
}

/// Install `lemmatizer` for `lang`, replacing any cached instance.
pub fn register_lemmatizer(lang: &str, lemmatizer: Arc<dyn Lemmatizer>) {
  if let Ok(mut map) = CACHE.write() {
    map.insert(cache_key(lang), lemmatizer);
  }
}

/// Lemmatise every page with the cached lemmatiser for `lang`.
pub fn tokenize_lemmas<P: AsRef<str>>(pages: &[P], lang: &str) -> Vec<Token> {
  let lemmatizer = lemmatizer(lang);
  pages
    .iter()
    .flat_map(|page| lemmatizer.lemmatize(page.as_ref()))
    .collect()
}
