//! Async client for the AnkiConnect add-on's JSON API.

use std::{collections::BTreeMap, time::Duration};

use reqwest::Client;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Value, json};

use crate::{Error, Result};

/// AnkiConnect's default listen address.
pub const DEFAULT_URL: &str = "http://127.0.0.1:8765";
const API_VERSION: u32 = 6;

#[derive(Serialize)]
struct Request<'a> {
  action:  &'a str,
  version: u32,
  params:  Value,
}

/// Every AnkiConnect reply is `{ "result": …, "error": null | "…" }`.
#[derive(Deserialize)]
struct Reply<T> {
  result: Option<T>,
  error:  Option<String>,
}

/// A note as returned by `notesInfo`. Only the fields are read; ids, model
/// and tags are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct NoteInfo {
  pub fields: BTreeMap<String, NoteField>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NoteField {
  pub value: String,
  pub order: u32,
}

impl NoteInfo {
  /// Raw (HTML) value of the field with the lowest `order`.
  pub fn first_field(&self) -> Option<&str> {
    self
      .fields
      .values()
      .min_by_key(|f| f.order)
      .map(|f| f.value.as_str())
  }
}

/// Cheap to clone: the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct AnkiConnect {
  client: Client,
  url:    String,
}

impl AnkiConnect {
  pub fn new(url: impl Into<String>) -> Result<Self> {
    let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
    Ok(Self {
      client,
      url: url.into(),
    })
  }

  async fn invoke<T: DeserializeOwned>(&self, action: &str, params: Value) -> Result<T> {
    let resp = self
      .client
      .post(&self.url)
      .json(&Request {
        action,
        version: API_VERSION,
        params,
      })
      .send()
      .await?
      .error_for_status()?;

    let reply: Reply<T> = resp.json().await?;
    match (reply.error, reply.result) {
      (Some(e), _) => Err(Error::AnkiConnect(format!("{action}: {e}"))),
      (None, Some(result)) => Ok(result),
      (None, None) => Err(Error::AnkiConnect(format!("{action}: empty result"))),
    }
  }

  /// `findNotes` for every note in `deck` (sub-decks included).
  pub async fn find_notes(&self, deck: &str) -> Result<Vec<i64>> {
    let query = format!("deck:\"{}\"", deck.replace('"', "\\\""));
    self.invoke("findNotes", json!({ "query": query })).await
  }

  /// `notesInfo` for `ids`. An empty request short-circuits.
  pub async fn notes_info(&self, ids: &[i64]) -> Result<Vec<NoteInfo>> {
    if ids.is_empty() {
      return Ok(Vec::new());
    }
    self.invoke("notesInfo", json!({ "notes": ids })).await
  }
}
