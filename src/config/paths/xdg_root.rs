//! XDG Base Directory utilities for codeshell data and config.

use crate::error::ShellError;
use std::path::PathBuf;

/// Get XDG data home directory
///
/// Returns `$XDG_DATA_HOME` if set, otherwise defaults to `$HOME/.local/share`
pub fn data_home() -> Option<PathBuf> {
    if let Ok(xdg_data_home) = std::env::var("XDG_DATA_HOME") {
        return Some(PathBuf::from(xdg_data_home));
    }

    std::env::var("HOME")
        .ok()
        .map(|home| PathBuf::from(home).join(".local").join("share"))
}

/// Get XDG config home directory
///
/// Returns `$XDG_CONFIG_HOME` if set, otherwise defaults to `$HOME/.config`
pub fn config_home() -> Result<PathBuf, ShellError> {
    if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg_config_home));
    }

    let home = std::env::var("HOME").map_err(|_| {
        ShellError::ConfigError(
            "Could not determine XDG config home directory (HOME not set)".to_string(),
        )
    })?;

    Ok(PathBuf::from(home).join(".config"))
}

/// `$XDG_CONFIG_HOME/codeshell/config.toml`
pub fn global_config_path() -> Result<PathBuf, ShellError> {
    Ok(config_home()?.join("codeshell").join("config.toml"))
}

/// `$XDG_DATA_HOME/codeshell/store`
pub fn default_store_path() -> Result<PathBuf, ShellError> {
    let data_home = data_home().ok_or_else(|| {
        ShellError::ConfigError(
            "Could not determine XDG data home directory (HOME not set)".to_string(),
        )
    })?;
    Ok(data_home.join("codeshell").join("store"))
}
