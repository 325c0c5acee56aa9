//! SQL schema for the vault.
//!
//! Executed on every open. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Per-connection settings. WAL lets readers see a committed snapshot while
/// another process writes.
pub const PRAGMAS: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;
";

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS sources (
    id     INTEGER PRIMARY KEY,
    kind   TEXT NOT NULL,    -- 'deck' | 'file' | 'apkg' | 'live' | 'book' | ...
    ident  TEXT NOT NULL,
    UNIQUE (kind, ident)
);

CREATE TABLE IF NOT EXISTS known_words (
    id     INTEGER PRIMARY KEY,
    lang   TEXT NOT NULL,
    lemma  TEXT NOT NULL,
    UNIQUE (lang, lemma)
);

-- A word lives exactly as long as at least one row here references it.
CREATE TABLE IF NOT EXISTS word_sources (
    word_id    INTEGER NOT NULL REFERENCES known_words(id) ON DELETE CASCADE,
    source_id  INTEGER NOT NULL REFERENCES sources(id)     ON DELETE CASCADE,
    PRIMARY KEY (word_id, source_id)
);

-- First excerpt seen for a word. Never overwritten.
CREATE TABLE IF NOT EXISTS occurrences (
    word_id   INTEGER PRIMARY KEY
              REFERENCES known_words(id) ON DELETE CASCADE,
    excerpt   TEXT NOT NULL,
    location  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS word_sources_source_idx ON word_sources(source_id);

PRAGMA user_version = 1;
";
