//! Configuration management.
//!
//! This module resolves where gpsync keeps its state and loads the optional
//! config file.
//!
//! # Layout
//!
//! Everything lives under a single global directory, `~/.gpsync/`:
//! - **Ledger**: `~/.gpsync/ledger.db` (SQLite)
//! - **Config**: `~/.gpsync/config.json` (optional defaults for `sync`)
//!
//! Command-line flags always win over the config file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Environment variable overriding the ledger location.
pub const LEDGER_ENV: &str = "GPSYNC_LEDGER";

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "GPSYNC_CONFIG";

/// Get the global gpsync directory location (`~/.gpsync/`).
#[must_use]
pub fn global_gpsync_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".gpsync"))
}

/// Resolve the ledger path.
///
/// Priority:
/// 1. If `explicit_path` is provided, use it directly
/// 2. `GPSYNC_LEDGER` environment variable
/// 3. Global location: `~/.gpsync/ledger.db`
///
/// # Returns
///
/// Returns the path to the ledger file, or `None` if no location found.
#[must_use]
pub fn resolve_ledger_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(LEDGER_ENV) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    global_gpsync_dir().map(|dir| dir.join("ledger.db"))
}

/// Defaults for `gpsync sync`, read from `config.json`.
///
/// Every field is optional; absent fields fall back to built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct GpsyncConfig {
    /// Path to the browser cookie export.
    pub auth: Option<PathBuf>,
    /// Archive output directory.
    pub output: Option<PathBuf>,
    pub per_page: Option<u32>,
    pub chunk_size: Option<usize>,
    /// API base URL (tests and proxies).
    pub base_url: Option<String>,
}

/// Get the config file path.
fn config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        if !path.trim().is_empty() {
            return Ok(PathBuf::from(path));
        }
    }
    global_gpsync_dir()
        .map(|dir| dir.join("config.json"))
        .ok_or_else(|| Error::Config("Could not determine home directory".into()))
}

/// Load the config file from its default location.
///
/// A missing file yields the default (empty) config.
///
/// # Errors
///
/// Returns `Config` if the file exists but cannot be read or parsed.
pub fn load_config() -> Result<GpsyncConfig> {
    load_config_from(&config_path()?)
}

/// Load the config file at `path`.
///
/// # Errors
///
/// Returns `Config` if the file exists but cannot be read or parsed.
pub fn load_config_from(path: &Path) -> Result<GpsyncConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "No config file, using defaults");
        return Ok(GpsyncConfig::default());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read config file {}: {e}", path.display())))?;

    serde_json::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse config file {}: {e}", path.display())))
}
