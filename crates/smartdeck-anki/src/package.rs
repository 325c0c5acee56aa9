//! `.apkg` writer: a zip holding a schema-11 `collection.anki2` and an empty
//! media map.

use std::{
  fs::File,
  io::Write as _,
  path::Path,
};

use chrono::Utc;
use rusqlite::params;
use serde_json::{Value, json};
use sha1::Sha1;
use sha2::{Digest as _, Sha256};
use smartdeck_core::deck::DeckEntry;
use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

use crate::{Result, html};

/// Note type shared by every SmartDeck package, so re-imports update notes
/// instead of creating a second model.
pub const MODEL_ID: i64 = 1_607_392_319;
const MODEL_NAME: &str = "SmartDeckModel";

/// Field order of [`MODEL_ID`]. The first field is the sort field.
pub const FIELDS: [&str; 6] = [
  "Word",
  "Translation",
  "IPA",
  "Grammar",
  "Excerpt",
  "SentenceTranslation",
];

const QFMT: &str = r#"<div class="word">{{Word}}</div>
<div class="excerpt">{{Excerpt}}</div>"#;

const AFMT: &str = r#"{{FrontSide}}
<hr id="answer">
{{#Translation}}<div><strong>Meaning:</strong> {{Translation}}</div>{{/Translation}}
{{#IPA}}<div><strong>IPA:</strong> {{IPA}}</div>{{/IPA}}
<div><strong>POS:</strong> {{Grammar}}</div>
{{#SentenceTranslation}}<div class="gloss">{{SentenceTranslation}}</div>{{/SentenceTranslation}}"#;

const CSS: &str = ".card { font-family: Arial; font-size: 20px; }
.word { font-size: 28px; font-weight: bold; }
.h { background-color: #ffeb3b; }
.gloss { color: #666; font-style: italic; }";

const SCHEMA: &str = "
CREATE TABLE col (
  id     INTEGER PRIMARY KEY,
  crt    INTEGER NOT NULL,
  mod    INTEGER NOT NULL,
  scm    INTEGER NOT NULL,
  ver    INTEGER NOT NULL,
  dty    INTEGER NOT NULL,
  usn    INTEGER NOT NULL,
  ls     INTEGER NOT NULL,
  conf   TEXT    NOT NULL,
  models TEXT    NOT NULL,
  decks  TEXT    NOT NULL,
  dconf  TEXT    NOT NULL,
  tags   TEXT    NOT NULL
);
CREATE TABLE notes (
  id    INTEGER PRIMARY KEY,
  guid  TEXT    NOT NULL,
  mid   INTEGER NOT NULL,
  mod   INTEGER NOT NULL,
  usn   INTEGER NOT NULL,
  tags  TEXT    NOT NULL,
  flds  TEXT    NOT NULL,
  sfld  INTEGER NOT NULL,
  csum  INTEGER NOT NULL,
  flags INTEGER NOT NULL,
  data  TEXT    NOT NULL
);
CREATE TABLE cards (
  id     INTEGER PRIMARY KEY,
  nid    INTEGER NOT NULL,
  did    INTEGER NOT NULL,
  ord    INTEGER NOT NULL,
  mod    INTEGER NOT NULL,
  usn    INTEGER NOT NULL,
  type   INTEGER NOT NULL,
  queue  INTEGER NOT NULL,
  due    INTEGER NOT NULL,
  ivl    INTEGER NOT NULL,
  factor INTEGER NOT NULL,
  reps   INTEGER NOT NULL,
  lapses INTEGER NOT NULL,
  left   INTEGER NOT NULL,
  odue   INTEGER NOT NULL,
  odid   INTEGER NOT NULL,
  flags  INTEGER NOT NULL,
  data   TEXT    NOT NULL
);
CREATE TABLE revlog (
  id      INTEGER PRIMARY KEY,
  cid     INTEGER NOT NULL,
  usn     INTEGER NOT NULL,
  ease    INTEGER NOT NULL,
  ivl     INTEGER NOT NULL,
  lastIvl INTEGER NOT NULL,
  factor  INTEGER NOT NULL,
  time    INTEGER NOT NULL,
  type    INTEGER NOT NULL
);
CREATE TABLE graves (
  usn  INTEGER NOT NULL,
  oid  INTEGER NOT NULL,
  type INTEGER NOT NULL
);
CREATE INDEX ix_notes_usn   ON notes (usn);
CREATE INDEX ix_cards_usn   ON cards (usn);
CREATE INDEX ix_revlog_usn  ON revlog (usn);
CREATE INDEX ix_cards_nid   ON cards (nid);
CREATE INDEX ix_cards_sched ON cards (did, queue, due);
CREATE INDEX ix_revlog_cid  ON revlog (cid);
CREATE INDEX ix_notes_csum  ON notes (csum);
";

/// Stable deck id for `deck_name`, in the range Anki uses for generated
/// decks (`[2^30, 2^31)`).
pub fn deck_id(deck_name: &str) -> i64 {
  let digest = Sha256::digest(deck_name.as_bytes());
  let n = u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]);
  (1 << 30) + i64::from(n & 0x3FFF_FFFF)
}

/// Write `entries` as an Anki package named `deck_name` to `output`,
/// replacing any existing file. One note (and one card) per entry.
pub fn write_package(deck_name: &str, entries: &[DeckEntry], output: &Path) -> Result<()> {
  if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
    std::fs::create_dir_all(parent)?;
  }

  let scratch = tempfile::tempdir()?;
  let db_path = scratch.path().join("collection.anki2");
  write_collection(&db_path, deck_name, entries)?;

  let mut zip = ZipWriter::new(File::create(output)?);
  let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

  zip.start_file("collection.anki2", options)?;
  zip.write_all(&std::fs::read(&db_path)?)?;
  zip.start_file("media", options)?;
  zip.write_all(b"{}")?;
  zip.finish()?;

  tracing::info!(deck = deck_name, notes = entries.len(), path = %output.display(), "wrote package");
  Ok(())
}

fn write_collection(path: &Path, deck_name: &str, entries: &[DeckEntry]) -> Result<()> {
  let mut conn = rusqlite::Connection::open(path)?;
  conn.execute_batch(SCHEMA)?;

  let now = Utc::now();
  let secs = now.timestamp();
  let millis = now.timestamp_millis();
  let did = deck_id(deck_name);

  let tx = conn.transaction()?;
  tx.execute(
    "INSERT INTO col (id, crt, mod, scm, ver, dty, usn, ls, conf, models, decks, dconf, tags)
     VALUES (1, ?1, ?2, ?2, 11, 0, 0, 0, ?3, ?4, ?5, ?6, '{}')",
    params![
      secs,
      millis,
      collection_conf(did).to_string(),
      models(did, secs).to_string(),
      decks(did, deck_name, secs).to_string(),
      deck_conf().to_string(),
    ],
  )?;

  {
    let mut note_stmt = tx.prepare(
      "INSERT INTO notes (id, guid, mid, mod, usn, tags, flds, sfld, csum, flags, data)
       VALUES (?1, ?2, ?3, ?4, -1, '', ?5, ?6, ?7, 0, '')",
    )?;
    let mut card_stmt = tx.prepare(
      "INSERT INTO cards (id, nid, did, ord, mod, usn, type, queue, due, ivl, factor,
                          reps, lapses, left, odue, odid, flags, data)
       VALUES (?1, ?2, ?3, 0, ?4, -1, 0, 0, ?5, 0, 0, 0, 0, 0, 0, 0, 0, '')",
    )?;

    for (i, entry) in entries.iter().enumerate() {
      let offset = i as i64;
      let id = millis + offset;
      note_stmt.execute(params![
        id,
        guid(did, &entry.lemma),
        MODEL_ID,
        secs,
        note_fields(entry),
        entry.lemma,
        checksum(&entry.lemma),
      ])?;
      card_stmt.execute(params![id, id, did, secs, offset + 1])?;
    }
  }

  tx.commit()?;
  Ok(())
}

/// The `\x1f`-joined field values, in [`FIELDS`] order.
fn note_fields(entry: &DeckEntry) -> String {
  let optional = |v: &Option<String>| v.as_deref().map(html::escape).unwrap_or_default();
  [
    html::escape(&entry.lemma),
    optional(&entry.translation),
    optional(&entry.ipa),
    html::escape(&entry.pos),
    html::excerpt_field(&entry.excerpt, &entry.lemma, &entry.location),
    optional(&entry.sentence_translation),
  ]
  .join("\x1f")
}

fn guid(did: i64, lemma: &str) -> String {
  let digest = Sha256::digest(format!("{did}\x1f{lemma}").as_bytes());
  hex::encode(&digest[..8])
}

/// Anki's duplicate-detection checksum: the first 32 bits of the SHA-1 of
/// the plain-text sort field.
fn checksum(sort_field: &str) -> i64 {
  let digest = Sha1::digest(sort_field.as_bytes());
  i64::from(u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]))
}

// ─── Collection JSON ──────────────────────────────────────────────────────────

fn collection_conf(did: i64) -> Value {
  json!({
    "activeDecks": [did],
    "curDeck": did,
    "newSpread": 0,
    "collapseTime": 1200,
    "timeLim": 0,
    "estTimes": true,
    "dueCounts": true,
    "curModel": MODEL_ID.to_string(),
    "nextPos": 1,
    "sortType": "noteFld",
    "sortBackwards": false,
    "addToCur": true,
  })
}

fn models(did: i64, now: i64) -> Value {
  let flds: Vec<Value> = FIELDS
    .iter()
    .enumerate()
    .map(|(ord, name)| {
      json!({
        "name": name,
        "ord": ord,
        "sticky": false,
        "rtl": false,
        "font": "Arial",
        "size": 20,
        "media": [],
      })
    })
    .collect();

  json!({
    MODEL_ID.to_string(): {
      "id": MODEL_ID,
      "name": MODEL_NAME,
      "type": 0,
      "mod": now,
      "usn": -1,
      "sortf": 0,
      "did": did,
      "tmpls": [{
        "name": "Card 1",
        "ord": 0,
        "qfmt": QFMT,
        "afmt": AFMT,
        "did": null,
        "bqfmt": "",
        "bafmt": "",
      }],
      "flds": flds,
      "css": CSS,
      "latexPre": "\\documentclass[12pt]{article}\n\\special{papersize=3in,5in}\n\\usepackage[utf8]{inputenc}\n\\usepackage{amssymb,amsmath}\n\\pagestyle{empty}\n\\setlength{\\parindent}{0in}\n\\begin{document}\n",
      "latexPost": "\\end{document}",
      "tags": [],
      "vers": [],
      "req": [[0, "any", [0]]],
    }
  })
}

fn decks(did: i64, deck_name: &str, now: i64) -> Value {
  let deck = |id: i64, name: &str| {
    json!({
      "id": id,
      "name": name,
      "mod": now,
      "usn": -1,
      "desc": "",
      "dyn": 0,
      "conf": 1,
      "collapsed": false,
      "extendNew": 10,
      "extendRev": 50,
      "newToday": [0, 0],
      "revToday": [0, 0],
      "lrnToday": [0, 0],
      "timeToday": [0, 0],
    })
  };
  json!({
    "1": deck(1, "Default"),
    did.to_string(): deck(did, deck_name),
  })
}

fn deck_conf() -> Value {
  json!({
    "1": {
      "id": 1,
      "name": "Default",
      "mod": 0,
      "usn": 0,
      "maxTaken": 60,
      "autoplay": true,
      "timer": 0,
      "replayq": true,
      "dyn": false,
      "new": {
        "delays": [1, 10],
        "ints": [1, 4, 7],
        "initialFactor": 2500,
        "order": 1,
        "perDay": 20,
        "bury": true,
        "separate": true,
      },
      "rev": {
        "perDay": 100,
        "ease4": 1.3,
        "fuzz": 0.05,
        "ivlFct": 1,
        "maxIvl": 36500,
        "bury": true,
        "minSpace": 1,
      },
      "lapse": {
        "delays": [10],
        "mult": 0,
        "minInt": 1,
        "leechFails": 8,
        "leechAction": 0,
      },
    }
  })
}
