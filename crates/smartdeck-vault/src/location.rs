//! Where the vault lives when no explicit path is given.

use std::{
  ffi::OsString,
  path::{Path, PathBuf},
};

use directories::{BaseDirs, ProjectDirs};

use crate::{Error, Result};

/// Environment variable that overrides the default vault path.
pub const VAULT_ENV: &str = "SMARTDECK_VAULT";

/// The default vault path: `$SMARTDECK_VAULT` if set, otherwise
/// `known.db` in the user's SmartDeck configuration directory.
pub fn default_path() -> Result<PathBuf> { resolve_path(None) }

/// The vault path with a configured fallback. `$SMARTDECK_VAULT` wins over
/// `configured`, which wins over the configuration directory. Empty values
/// count as unset.
pub fn resolve_path(configured: Option<PathBuf>) -> Result<PathBuf> {
  resolve(std::env::var_os(VAULT_ENV), configured)
}

pub(crate) fn resolve(env_value: Option<OsString>, configured: Option<PathBuf>) -> Result<PathBuf> {
  let explicit = env_value
    .filter(|v| !v.is_empty())
    .map(PathBuf::from)
    .or_else(|| configured.filter(|p| !p.as_os_str().is_empty()));
  if let Some(path) = explicit {
    return Ok(expand_tilde(path));
  }
  ProjectDirs::from("", "", "smartdeck")
    .map(|dirs| dirs.config_dir().join("known.db"))
    .ok_or(Error::NoConfigDir)
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: impl AsRef<Path>) -> PathBuf {
  let path = path.as_ref();
  if let Ok(rest) = path.strip_prefix("~")
    && let Some(base) = BaseDirs::new()
  {
    return base.home_dir().join(rest);
  }
  path.to_path_buf()
}
