//! Layered settings: defaults, then the optional TOML file, then
//! `SMARTDECK_*` environment variables. Command-line flags are applied on
//! top by the caller. `SMARTDECK_VAULT` is left to
//! [`smartdeck_vault::resolve_path`], which weighs it against `vault`.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use directories::ProjectDirs;
use serde::Deserialize;
use smartdeck_anki::connect::DEFAULT_URL;
use smartdeck_vault::VAULT_ENV;

pub const ENV_PREFIX: &str = "SMARTDECK";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
  /// Vault file, used when neither `--vault` nor `$SMARTDECK_VAULT` is set.
  pub vault:            Option<PathBuf>,
  /// Language used when a command is given no `--lang`.
  pub lang:             String,
  pub anki_connect_url: String,
  /// Unknown lemmas listed by `diff`.
  pub diff_top:         usize,
  /// Cards written by `build`.
  pub build_top:        usize,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      vault:            None,
      lang:             "en".into(),
      anki_connect_url: DEFAULT_URL.into(),
      diff_top:         20,
      build_top:        100,
    }
  }
}

impl Settings {
  /// Load settings from `file` (or the default config file when `None`).
  /// A missing file is not an error.
  pub fn load(file: Option<&Path>) -> anyhow::Result<Self> {
    let file = file.map(Path::to_path_buf).or_else(default_config_file);

    let mut builder = config::Config::builder();
    if let Some(file) = file {
      tracing::debug!(path = %file.display(), "config file");
      builder = builder.add_source(config::File::from(file).required(false));
    }

    builder
      .add_source(config::Environment::with_prefix(ENV_PREFIX).source(Some(env_without_vault())))
      .build()
      .context("failed to read configuration")?
      .try_deserialize()
      .context("failed to deserialise settings")
  }
}

fn env_without_vault() -> config::Map<String, String> {
  std::env::vars_os()
    .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
    .filter(|(k, _)| k != VAULT_ENV)
    .collect()
}

fn default_config_file() -> Option<PathBuf> {
  ProjectDirs::from("", "", "smartdeck").map(|dirs| dirs.config_dir().join("config.toml"))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn file_values_override_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("config.toml");
    std::fs::write(&file, "lang = \"de\"\nbuild_top = 7\n").unwrap();

    let settings = Settings::load(Some(&file)).unwrap();
    assert_eq!(settings.lang, "de");
    assert_eq!(settings.build_top, 7);
    assert_eq!(settings.diff_top, 20);
  }

  #[test]
  fn vault_comes_from_the_file_only() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("config.toml");
    std::fs::write(&file, "vault = \"~/decks/known.db\"\n").unwrap();

    let settings = Settings::load(Some(&file)).unwrap();
    assert_eq!(settings.vault, Some(PathBuf::from("~/decks/known.db")));
    assert!(env_without_vault().keys().all(|k| k != VAULT_ENV));
  }

  #[test]
  fn missing_file_yields_defaults() {
    let settings = Settings::load(Some(Path::new("/nonexistent/smartdeck.toml"))).unwrap();
    assert_eq!(settings.anki_connect_url, DEFAULT_URL);
  }
}
