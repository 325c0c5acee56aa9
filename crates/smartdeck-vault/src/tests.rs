//! Integration tests for `SqliteVault` against in-memory and on-disk
//! databases.

use std::{ffi::OsString, path::PathBuf};

use smartdeck_core::{
  coverage::Tier,
  source::kind,
  vault::Vault,
  word::{Occurrence, Occurrences},
};

use crate::{Error, SqliteVault, location};

async fn vault() -> SqliteVault {
  SqliteVault::open_in_memory()
    .await
    .expect("in-memory vault")
}

fn words(lemmas: &[&str]) -> Vec<String> { lemmas.iter().map(|w| w.to_string()).collect() }

fn no_occ() -> Occurrences { Occurrences::new() }

async fn lemmas(v: &SqliteVault, lang: &str) -> Vec<String> {
  v.known_words(lang)
    .await
    .unwrap()
    .into_iter()
    .map(|w| w.lemma)
    .collect()
}

// ─── Sources ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn get_or_create_source_is_idempotent() {
  let v = vault().await;
  let a = v.get_or_create_source(kind::DECK, "DeckA").await.unwrap();
  let b = v.get_or_create_source(kind::DECK, "DeckA").await.unwrap();
  assert_eq!(a, b);
  assert_eq!(v.list_sources().await.unwrap().len(), 1);
}

#[tokio::test]
async fn same_ident_under_two_kinds_is_two_sources() {
  let v = vault().await;
  let file = v.get_or_create_source(kind::FILE, "X").await.unwrap();
  let deck = v.get_or_create_source(kind::DECK, "X").await.unwrap();
  assert_ne!(file, deck);
  assert_eq!(v.list_sources().await.unwrap().len(), 2);
}

// ─── add_words ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_then_remove() {
  let v = vault().await;
  v.add_words("en", &words(&["cat", "dog"]), kind::DECK, "DeckA", &no_occ())
    .await
    .unwrap();
  assert_eq!(v.coverage("en", &words(&["cat", "dog"])).await.unwrap().ratio, 1.0);

  assert!(v.remove_source(kind::DECK, "DeckA").await.unwrap());
  assert_eq!(v.coverage("en", &words(&["cat"])).await.unwrap().ratio, 0.0);
  assert!(v.list_sources().await.unwrap().is_empty());
}

#[tokio::test]
async fn duplicate_add_is_idempotent() {
  let v = vault().await;
  v.add_words("en", &words(&["fox"]), kind::DECK, "D1", &no_occ()).await.unwrap();
  v.add_words("en", &words(&["fox"]), kind::DECK, "D1", &no_occ()).await.unwrap();

  assert_eq!(lemmas(&v, "en").await, vec!["fox"]);
  let sources = v.list_sources().await.unwrap();
  assert_eq!(sources.len(), 1);
  assert_eq!(sources[0].word_count, 1);
}

#[tokio::test]
async fn duplicates_within_one_call_collapse() {
  let v = vault().await;
  v.add_words("en", &words(&["owl", "owl", "owl"]), kind::FILE, "B", &no_occ())
    .await
    .unwrap();
  assert_eq!(lemmas(&v, "en").await, vec!["owl"]);
}

#[tokio::test]
async fn empty_lemmas_still_register_the_source() {
  let v = vault().await;
  v.add_words("en", &[], kind::APKG, "/tmp/empty.apkg", &no_occ()).await.unwrap();

  let sources = v.list_sources().await.unwrap();
  assert_eq!(sources.len(), 1);
  assert_eq!(sources[0].source.kind, kind::APKG);
  assert_eq!(sources[0].word_count, 0);
  assert!(lemmas(&v, "en").await.is_empty());
}

#[tokio::test]
async fn lemma_case_is_stored_as_given() {
  let v = vault().await;
  v.add_words("de", &words(&["Hund", "hund"]), kind::DECK, "D", &no_occ()).await.unwrap();
  assert_eq!(lemmas(&v, "de").await, vec!["Hund", "hund"]);
}

// ─── Occurrences ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn occurrence_is_stored() {
  let v = vault().await;
  let occ = Occurrences::from([("owl".to_string(), Occurrence::new("The wise owl hooted.", "ch3:42"))]);
  v.add_words("en", &words(&["owl"]), kind::FILE, "BookX", &occ).await.unwrap();

  assert_eq!(
    v.occurrence("en", "owl").await.unwrap(),
    Some(Occurrence::new("The wise owl hooted.", "ch3:42"))
  );
}

#[tokio::test]
async fn first_occurrence_wins() {
  let v = vault().await;
  let first  = Occurrences::from([("owl".to_string(), Occurrence::new("First owl.", "1:1"))]);
  let second = Occurrences::from([("owl".to_string(), Occurrence::new("Second owl.", "9:9"))]);

  v.add_words("en", &words(&["owl"]), kind::FILE, "A", &first).await.unwrap();
  v.add_words("en", &words(&["owl"]), kind::FILE, "B", &second).await.unwrap();

  assert_eq!(v.occurrence("en", "owl").await.unwrap().unwrap().excerpt, "First owl.");
}

#[tokio::test]
async fn occurrences_ignore_lemmas_not_being_added() {
  let v = vault().await;
  let occ = Occurrences::from([("ghost".to_string(), Occurrence::new("Boo.", "1:1"))]);
  v.add_words("en", &words(&["owl"]), kind::FILE, "A", &occ).await.unwrap();

  assert_eq!(lemmas(&v, "en").await, vec!["owl"]);
  assert!(v.occurrence("en", "ghost").await.unwrap().is_none());
  assert!(v.occurrence("en", "owl").await.unwrap().is_none());
}

#[tokio::test]
async fn occurrence_persists_until_last_source_is_removed() {
  let v = vault().await;
  let occ = Occurrences::from([("b".to_string(), Occurrence::new("Excerpt B", "loc:1"))]);
  v.add_words("en", &words(&["a", "b"]), kind::DECK, "d1", &occ).await.unwrap();
  v.add_words("en", &words(&["b", "c"]), kind::DECK, "d2", &no_occ()).await.unwrap();

  v.remove_source(kind::DECK, "d1").await.unwrap();
  assert_eq!(lemmas(&v, "en").await, vec!["b", "c"]);
  assert_eq!(
    v.occurrence("en", "b").await.unwrap(),
    Some(Occurrence::new("Excerpt B", "loc:1"))
  );

  v.remove_source(kind::DECK, "d2").await.unwrap();
  assert!(lemmas(&v, "en").await.is_empty());
  assert!(v.occurrence("en", "b").await.unwrap().is_none());
}

// ─── remove_source ───────────────────────────────────────────────────────────

#[tokio::test]
async fn shared_words_survive_removal() {
  let v = vault().await;
  v.add_words("en", &words(&["wolf"]), kind::DECK, "DeckA", &no_occ()).await.unwrap();
  v.add_words("en", &words(&["wolf"]), kind::FILE, "Book1", &no_occ()).await.unwrap();

  v.remove_source(kind::DECK, "DeckA").await.unwrap();
  assert_eq!(v.coverage("en", &words(&["wolf"])).await.unwrap().ratio, 1.0);

  v.remove_source(kind::FILE, "Book1").await.unwrap();
  assert_eq!(v.coverage("en", &words(&["wolf"])).await.unwrap().ratio, 0.0);
}

#[tokio::test]
async fn mixed_kinds_do_not_interfere() {
  let v = vault().await;
  v.add_words("en", &words(&["x"]), kind::FILE, "id1", &no_occ()).await.unwrap();
  v.add_words("en", &words(&["y"]), kind::DECK, "id1", &no_occ()).await.unwrap();

  v.remove_source(kind::FILE, "id1").await.unwrap();
  assert_eq!(lemmas(&v, "en").await, vec!["y"]);
}

#[tokio::test]
async fn removing_a_missing_source_is_a_no_op() {
  let v = vault().await;
  v.add_words("en", &words(&["kept"]), kind::DECK, "Other", &no_occ()).await.unwrap();

  assert!(!v.remove_source(kind::DECK, "NotThere").await.unwrap());
  assert!(!v.remove_source(kind::DECK, "NotThere").await.unwrap());
  assert_eq!(lemmas(&v, "en").await, vec!["kept"]);
  assert_eq!(v.list_sources().await.unwrap().len(), 1);
}

#[tokio::test]
async fn double_removal_changes_nothing_the_second_time() {
  let v = vault().await;
  v.add_words("en", &words(&["a", "b"]), kind::DECK, "A", &no_occ()).await.unwrap();
  v.add_words("en", &words(&["b"]), kind::DECK, "B", &no_occ()).await.unwrap();

  assert!(v.remove_source(kind::DECK, "A").await.unwrap());
  let after_first = (lemmas(&v, "en").await, v.list_sources().await.unwrap());

  assert!(!v.remove_source(kind::DECK, "A").await.unwrap());
  let after_second = (lemmas(&v, "en").await, v.list_sources().await.unwrap());

  assert_eq!(after_first, after_second);
  assert_eq!(after_second.0, vec!["b"]);
}

#[tokio::test]
async fn removal_unlinks_words_in_every_language() {
  let v = vault().await;
  v.add_words("en", &words(&["hello"]), kind::DECK, "Mixed", &no_occ()).await.unwrap();
  v.add_words("de", &words(&["hallo"]), kind::DECK, "Mixed", &no_occ()).await.unwrap();
  v.add_words("de", &words(&["hallo"]), kind::DECK, "German", &no_occ()).await.unwrap();

  v.remove_source(kind::DECK, "Mixed").await.unwrap();
  assert!(lemmas(&v, "en").await.is_empty());
  assert_eq!(lemmas(&v, "de").await, vec!["hallo"]);
}

// ─── Atomicity ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn failed_add_leaves_no_partial_batch() {
  let v = vault().await;
  let old = Occurrences::from([("keep".to_string(), Occurrence::new("Keep it.", "1:1"))]);
  v.add_words("en", &words(&["keep"]), kind::DECK, "Old", &old).await.unwrap();

  v.execute_batch(
    "CREATE TRIGGER boom BEFORE INSERT ON known_words WHEN NEW.lemma = 'boom'
     BEGIN SELECT RAISE(ABORT, 'boom rejected'); END;",
  )
  .await
  .unwrap();

  let occ = Occurrences::from([("a".to_string(), Occurrence::new("An a.", "2:1"))]);
  let err = v
    .add_words("en", &words(&["a", "b", "boom"]), kind::DECK, "New", &occ)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::IntegrityViolation(_)), "{err:?}");

  assert_eq!(lemmas(&v, "en").await, vec!["keep"]);
  let sources = v.list_sources().await.unwrap();
  assert_eq!(sources.len(), 1);
  assert_eq!(sources[0].source.ident, "Old");
  assert!(v.occurrence("en", "a").await.unwrap().is_none());
  assert_eq!(v.occurrence("en", "keep").await.unwrap(), Some(Occurrence::new("Keep it.", "1:1")));
}

#[tokio::test]
async fn failed_removal_keeps_source_words_and_occurrences() {
  let v = vault().await;
  let occ = Occurrences::from([("solo".to_string(), Occurrence::new("Solo run.", "3:4"))]);
  v.add_words("en", &words(&["solo", "pair"]), kind::DECK, "Locked", &occ).await.unwrap();
  v.add_words("en", &words(&["pair"]), kind::DECK, "Other", &no_occ()).await.unwrap();

  v.execute_batch(
    "CREATE TRIGGER locked BEFORE DELETE ON sources
     BEGIN SELECT RAISE(ABORT, 'source is locked'); END;",
  )
  .await
  .unwrap();

  assert!(v.remove_source(kind::DECK, "Locked").await.is_err());
  assert_eq!(lemmas(&v, "en").await, vec!["pair", "solo"]);
  let counts: Vec<(String, u64)> = v
    .list_sources()
    .await
    .unwrap()
    .into_iter()
    .map(|s| (s.source.ident, s.word_count))
    .collect();
  assert_eq!(counts, vec![("Locked".to_string(), 2), ("Other".to_string(), 1)]);
  assert_eq!(v.occurrence("en", "solo").await.unwrap(), Some(Occurrence::new("Solo run.", "3:4")));

  v.execute_batch("DROP TRIGGER locked;").await.unwrap();
  assert!(v.remove_source(kind::DECK, "Locked").await.unwrap());
  assert_eq!(lemmas(&v, "en").await, vec!["pair"]);
  assert!(v.occurrence("en", "solo").await.unwrap().is_none());
}

// ─── Coverage ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn language_isolation() {
  let v = vault().await;
  v.add_words("es", &words(&["gato"]), kind::DECK, "SpanishDeck", &no_occ()).await.unwrap();

  let c = v.coverage("en", &words(&["gato"])).await.unwrap();
  assert_eq!(c.ratio, 0.0);
  assert_eq!(c.tier, Tier::Frustrating);
  assert_eq!(v.coverage("es", &words(&["gato"])).await.unwrap().ratio, 1.0);
}

#[tokio::test]
async fn coverage_tiers_against_the_vault() {
  let v = vault().await;
  v.add_words("en", &words(&["a"]), kind::DECK, "Dummy", &no_occ()).await.unwrap();

  for (known, unknown, tier) in [
    (98, 2, Tier::Easy),
    (95, 5, Tier::Adequate),
    (90, 10, Tier::Challenging),
    (80, 20, Tier::Frustrating),
  ] {
    let mut sample = vec!["a".to_string(); known];
    sample.extend(vec!["x".to_string(); unknown]);
    let c = v.coverage("en", &sample).await.unwrap();
    assert_eq!(c.tier, tier, "{known}/{unknown}");
    assert_eq!(c.unknown.count("x"), unknown as u64);
  }
}

#[tokio::test]
async fn coverage_is_case_insensitive() {
  let v = vault().await;
  v.add_words("en", &words(&["cat"]), kind::DECK, "D", &no_occ()).await.unwrap();

  let c = v.coverage("en", &words(&["Cat", "Dog"])).await.unwrap();
  assert_eq!(c.ratio, 0.5);
  assert_eq!(c.unknown.count("Cat"), 0);
  assert_eq!(c.unknown.count("Dog"), 1);
  assert_eq!(c.unknown.count("dog"), 1);
}

#[tokio::test]
async fn stored_mixed_case_lemma_matches_lowercase_candidate() {
  let v = vault().await;
  v.add_words("de", &words(&["Hund"]), kind::DECK, "D", &no_occ()).await.unwrap();
  assert_eq!(v.coverage("de", &words(&["hund", "HUND"])).await.unwrap().ratio, 1.0);
}

#[tokio::test]
async fn empty_candidate_list_is_fully_covered() {
  let v = vault().await;
  let c = v.coverage("en", &[]).await.unwrap();
  assert_eq!(c.ratio, 1.0);
  assert!(c.unknown.is_empty());
}

// ─── Persistence & location ──────────────────────────────────────────────────

#[tokio::test]
async fn reopening_a_file_keeps_its_contents() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("nested").join("known.db");

  {
    let v = SqliteVault::open(&path).await.unwrap();
    v.add_words("en", &words(&["persist"]), kind::BOOK, "/books/a.epub", &no_occ())
      .await
      .unwrap();
  }

  let v = SqliteVault::open(&path).await.unwrap();
  assert_eq!(lemmas(&v, "en").await, vec!["persist"]);
  assert_eq!(v.list_sources().await.unwrap()[0].source.ident, "/books/a.epub");
}

#[tokio::test]
async fn two_handles_on_one_file_see_each_others_writes() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("known.db");

  let writer = SqliteVault::open(&path).await.unwrap();
  let reader = SqliteVault::open(&path).await.unwrap();

  writer
    .add_words("en", &words(&["shared"]), kind::LIVE, "Deck", &no_occ())
    .await
    .unwrap();
  assert_eq!(reader.coverage("en", &words(&["shared"])).await.unwrap().ratio, 1.0);

  reader.remove_source(kind::LIVE, "Deck").await.unwrap();
  assert!(lemmas(&writer, "en").await.is_empty());
}

#[test]
fn env_override_wins() {
  let path = location::resolve(
    Some(OsString::from("/tmp/custom/known.db")),
    Some(PathBuf::from("/tmp/configured.db")),
  )
  .unwrap();
  assert_eq!(path, PathBuf::from("/tmp/custom/known.db"));
}

#[test]
fn configured_path_applies_when_env_is_unset_or_empty() {
  let configured = || Some(PathBuf::from("/srv/vault.db"));
  assert_eq!(location::resolve(None, configured()).unwrap(), PathBuf::from("/srv/vault.db"));
  assert_eq!(
    location::resolve(Some(OsString::new()), configured()).unwrap(),
    PathBuf::from("/srv/vault.db")
  );
}

#[test]
fn tilde_is_expanded_for_env_and_configured_paths() {
  let Some(home) = directories::BaseDirs::new().map(|b| b.home_dir().to_path_buf()) else {
    return;
  };
  assert_eq!(
    location::resolve(Some(OsString::from("~/v/known.db")), None).unwrap(),
    home.join("v/known.db")
  );
  assert_eq!(
    location::resolve(None, Some(PathBuf::from("~/c/known.db"))).unwrap(),
    home.join("c/known.db")
  );
  assert_eq!(location::expand_tilde("/abs/known.db"), PathBuf::from("/abs/known.db"));
}

#[test]
fn empty_env_and_config_fall_back_to_config_dir() {
  if let Ok(path) = location::resolve(Some(OsString::new()), Some(PathBuf::new())) {
    assert!(path.ends_with("known.db"));
  }
}
