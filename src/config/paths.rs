//! Default vault location.

use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

use crate::errors::{Result, VaultaError};

/// Environment variable that overrides the vault path.
pub const VAULT_PATH_ENV: &str = "VAULTA_VAULT_PATH";

/// Resolve the default vault file path.
///
/// `VAULTA_VAULT_PATH` wins if set.  Otherwise the per-user local data
/// directory is used (`%LOCALAPPDATA%` on Windows, `~/Library/Application
/// Support` on macOS, `$XDG_DATA_HOME` or `~/.local/share` elsewhere),
/// followed by `vaulta/vault.json`.
pub fn default_vault_path() -> Result<PathBuf> {
    resolve(env::var_os(VAULT_PATH_ENV), dirs::data_local_dir(), dirs::home_dir)
}

fn resolve(
    override_path: Option<OsString>,
    data_dir: Option<PathBuf>,
    home_dir: impl FnOnce() -> Option<PathBuf>,
) -> Result<PathBuf> {
    if let Some(p) = override_path.filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(p));
    }

    let base = data_dir
        .or_else(|| home_dir().map(|home| home.join(".local").join("share")))
        .ok_or_else(|| {
            VaultaError::ConfigError(format!(
                "cannot locate a data directory; set {VAULT_PATH_ENV}"
            ))
        })?;

    Ok(base.join("vaulta").join("vault.json"))
}
