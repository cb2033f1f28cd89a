//! Settings and access token loading.
//!
//! Settings are read from ~/.config/calremind/config.toml, with
//! `CALREMIND_*` environment variables taking precedence. Google access
//! tokens are read from:
//!   ~/.config/calremind/providers/google/tokens/{account}.json

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use calremind_core::Settings;
use config::{Config, Environment, File};
use serde::Deserialize;

fn base_dir() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .context("Could not determine config directory")?
        .join("calremind"))
}

pub fn config_path() -> Result<PathBuf> {
    Ok(base_dir()?.join("config.toml"))
}

/// Expand a leading `~` the way the shell would.
pub fn expand_path(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}

/// Load settings from `path`, or from the default config file.
///
/// A missing file is fine and yields the defaults.
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let path = match path {
        Some(path) => expand_path(path),
        None => config_path()?,
    };

    let settings: Settings = Config::builder()
        .add_source(File::from(path.clone()).required(false))
        .add_source(Environment::with_prefix("CALREMIND").try_parsing(true))
        .build()
        .with_context(|| format!("Failed to read settings from {}", path.display()))?
        .try_deserialize()
        .with_context(|| format!("Invalid settings in {}", path.display()))?;

    Ok(settings)
}

/// Default location of a Google account's access token.
pub fn google_token_path(account_id: &str) -> Result<PathBuf> {
    Ok(base_dir()?
        .join("providers")
        .join("google")
        .join("tokens")
        .join(format!("{}.json", account_id)))
}

#[derive(Debug, Deserialize)]
struct StoredToken {
    access_token: String,
}

pub fn load_access_token(path: &Path) -> Result<String> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read access token from {}", path.display()))?;

    let token: StoredToken = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse access token from {}", path.display()))?;

    Ok(token.access_token)
}
