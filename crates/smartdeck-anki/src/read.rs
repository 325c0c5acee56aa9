//! `.apkg` reader: the word on the front of every note.

use std::{fs::File, path::Path};

use rusqlite::OpenFlags;
use zip::ZipArchive;

use crate::{Error, Result};

/// Collection entries in preference order. Newer Anki versions ship the
/// `anki21` file next to a stub `anki2`.
const COLLECTIONS: [&str; 2] = ["collection.anki21", "collection.anki2"];

/// The trimmed, non-empty first field of each note in the package at
/// `path`, in note-creation order. `top` keeps only the first `top` notes.
///
/// Blocking; run it off the async runtime.
pub fn read_package_words(path: &Path, top: Option<usize>) -> Result<Vec<String>> {
  if !path.is_file() {
    return Err(Error::NotFound(path.to_path_buf()));
  }

  let mut archive = ZipArchive::new(File::open(path)?).map_err(|e| Error::malformed(path, e))?;

  let scratch = tempfile::tempdir()?;
  let db_path = scratch.path().join("collection.db");
  let mut found = false;
  for name in COLLECTIONS {
    if let Ok(mut entry) = archive.by_name(name) {
      let mut out = File::create(&db_path)?;
      std::io::copy(&mut entry, &mut out)?;
      tracing::debug!(entry = name, path = %path.display(), "reading collection");
      found = true;
      break;
    }
  }
  if !found {
    return Err(Error::malformed(path, "no collection.anki2 or collection.anki21 entry"));
  }

  first_fields(&db_path, top).map_err(|e| Error::malformed(path, e))
}

fn first_fields(db_path: &Path, top: Option<usize>) -> rusqlite::Result<Vec<String>> {
  let conn = rusqlite::Connection::open_with_flags(db_path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
  // LIMIT -1 is unbounded.
  let limit = top.map_or(-1, |n| i64::try_from(n).unwrap_or(i64::MAX));

  let mut stmt = conn.prepare("SELECT flds FROM notes ORDER BY id LIMIT ?1")?;
  let rows = stmt.query_map([limit], |row| row.get::<_, Option<String>>(0))?;

  let mut words = Vec::new();
  for flds in rows {
    let Some(flds) = flds? else { continue };
    let first = flds.split('\x1f').next().unwrap_or_default().trim();
    if !first.is_empty() {
      words.push(first.to_owned());
    }
  }
  Ok(words)
}
