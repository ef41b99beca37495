//! Path helpers for the state file location.
//!
//! Responsibilities:
//! - Honor the `SENTINEL_CONFIG_PATH` override.
//! - Fall back to the platform config directory via `directories`.

use std::path::PathBuf;

use anyhow::Context;

use crate::loader::env_var_or_none;

/// Environment variable overriding the state file path.
pub const CONFIG_PATH_ENV: &str = "SENTINEL_CONFIG_PATH";

/// Returns the path to the state file.
///
/// - `SENTINEL_CONFIG_PATH` if set
/// - Linux: `~/.config/sentinel-dashboard/state.json`
/// - macOS: `~/Library/Application Support/sentinel-dashboard/state.json`
/// - Windows: `%AppData%\sentinel-dashboard\config\state.json`
pub fn default_state_path() -> Result<PathBuf, anyhow::Error> {
    if let Some(path) = env_var_or_none(CONFIG_PATH_ENV) {
        return Ok(PathBuf::from(path));
    }

    let proj_dirs = directories::ProjectDirs::from("", "", "sentinel-dashboard")
        .context("Failed to determine project directories")?;

    Ok(proj_dirs.config_dir().join("state.json"))
}
