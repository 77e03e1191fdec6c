//! Persistent Settings Store
//!
//! JSON file holding one settings object per application identity:
//!
//! ```json
//! { "quickprompt": { "mruCommands": ["define"], "numRecentPrompts": 50, ... } }
//! ```
//!
//! Entries belonging to other identities are preserved on save.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::models::settings::{AppSettings, SettingsUpdate};
use crate::utils::error::{AppError, AppResult};
use crate::utils::paths::ensure_dir;

/// Identity the desktop app stores its settings under
pub const DEFAULT_IDENTITY: &str = "quickprompt";

/// Settings store for one application identity
#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    identity: String,
    settings: AppSettings,
}

impl SettingsStore {
    /// Open the store, falling back to defaults when the file or the identity
    /// entry does not exist yet
    pub fn open(path: impl Into<PathBuf>, identity: impl Into<String>) -> AppResult<Self> {
        let path = path.into();
        let identity = identity.into();

        let settings = match Self::read_all(&path)?.remove(&identity) {
            Some(value) => {
                let settings: AppSettings = serde_json::from_value(value)?;
                settings.validate().map_err(AppError::validation)?;
                settings
            }
            None => AppSettings::default(),
        };

        Ok(Self {
            path,
            identity,
            settings,
        })
    }

    fn read_all(path: &Path) -> AppResult<BTreeMap<String, Value>> {
        if !path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    /// Get the current settings
    pub fn get(&self) -> &AppSettings {
        &self.settings
    }

    /// Apply a partial update and persist it
    pub fn update(&mut self, update: SettingsUpdate) -> AppResult<AppSettings> {
        let mut next = self.settings.clone();
        next.apply_update(update);
        next.validate().map_err(AppError::validation)?;
        self.settings = next;
        self.save()?;
        Ok(self.settings.clone())
    }

    /// Replace the stored MRU list and persist it
    pub fn set_mru(&mut self, mru: &[String]) -> AppResult<()> {
        if self.settings.mru_commands == mru {
            return Ok(());
        }
        self.settings.mru_commands = mru.to_vec();
        self.save()
    }

    /// Write the settings back, keeping other identities' entries
    pub fn save(&self) -> AppResult<()> {
        self.settings.validate().map_err(AppError::validation)?;
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }

        let mut all = Self::read_all(&self.path).unwrap_or_else(|e| {
            tracing::warn!(
                "[SettingsStore] Discarding unreadable {}: {}",
                self.path.display(),
                e
            );
            BTreeMap::new()
        });
        all.insert(self.identity.clone(), serde_json::to_value(&self.settings)?);

        let content = serde_json::to_string_pretty(&all)?;
        fs::write(&self.path, content)?;
        tracing::debug!("[SettingsStore] Saved settings for '{}'", self.identity);
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
