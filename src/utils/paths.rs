//! Cross-Platform Path Utilities
//!
//! Functions for resolving application directories across platforms.
//! Configuration lives under the platform config dir (`~/.config/quickprompt`
//! on Linux), the log file under the platform data dir.

use std::path::{Path, PathBuf};

use crate::utils::error::{AppError, AppResult};

/// Directory name used under the platform config and data dirs
pub const APP_DIR_NAME: &str = "quickprompt";

/// Get the QuickPrompt config directory
pub fn app_config_dir() -> AppResult<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .ok_or_else(|| AppError::config("Could not determine config directory"))
}

/// Get the QuickPrompt data directory (falls back to the config directory)
pub fn app_data_dir() -> AppResult<PathBuf> {
    match dirs::data_dir() {
        Some(dir) => Ok(dir.join(APP_DIR_NAME)),
        None => app_config_dir(),
    }
}

/// Regenerated system defaults file inside `dir`
pub fn defaults_path(dir: &Path) -> PathBuf {
    dir.join("defaults.toml")
}

/// User configuration file inside `dir`
pub fn user_config_path(dir: &Path) -> PathBuf {
    dir.join("config.toml")
}

/// Persistent settings file inside `dir`
pub fn settings_path(dir: &Path) -> PathBuf {
    dir.join("settings.json")
}

/// Get the log file path
pub fn log_path() -> AppResult<PathBuf> {
    Ok(app_data_dir()?.join("quickprompt.log"))
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> AppResult<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Get the config directory, creating it if it doesn't exist
pub fn ensure_app_config_dir() -> AppResult<PathBuf> {
    let path = app_config_dir()?;
    ensure_dir(&path)?;
    Ok(path)
}
