//! Settings Models
//!
//! Persistent per-user settings stored in settings.json.

use serde::{Deserialize, Serialize};

/// Default number of names kept in the most-recently-used list
pub const DEFAULT_NUM_RECENT_PROMPTS: usize = 50;
/// Default number of rows the palette shows
pub const DEFAULT_PALETTE_ROWS: usize = 6;
/// Default per-request timeout
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;
/// Upper bound for the per-request timeout
pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 3600;

/// Settings stored for one application identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    /// Prompt names, most recent first
    pub mru_commands: Vec<String>,
    /// Maximum length of the MRU list
    pub num_recent_prompts: usize,
    /// Rows shown by the palette
    pub palette_rows: usize,
    /// Provider used when none is named
    pub default_provider: String,
    /// Per-request deadline in seconds
    pub request_timeout_secs: u64,
    /// Echo the submitted query above the answer
    pub echo_query: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            mru_commands: Vec::new(),
            num_recent_prompts: DEFAULT_NUM_RECENT_PROMPTS,
            palette_rows: DEFAULT_PALETTE_ROWS,
            default_provider: "openai".to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            echo_query: false,
        }
    }
}

/// Settings update request (partial update)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub mru_commands: Option<Vec<String>>,
    pub num_recent_prompts: Option<usize>,
    pub palette_rows: Option<usize>,
    pub default_provider: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub echo_query: Option<bool>,
}

impl AppSettings {
    /// Apply a partial update to the settings
    pub fn apply_update(&mut self, update: SettingsUpdate) {
        if let Some(mru) = update.mru_commands {
            self.mru_commands = mru;
        }
        if let Some(limit) = update.num_recent_prompts {
            self.num_recent_prompts = limit;
        }
        if let Some(rows) = update.palette_rows {
            self.palette_rows = rows;
        }
        if let Some(provider) = update.default_provider {
            self.default_provider = provider;
        }
        if let Some(secs) = update.request_timeout_secs {
            self.request_timeout_secs = secs;
        }
        if let Some(echo) = update.echo_query {
            self.echo_query = echo;
        }
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<(), String> {
        if self.num_recent_prompts == 0 {
            return Err("numRecentPrompts must be at least 1".to_string());
        }
        if self.num_recent_prompts > 1000 {
            return Err("numRecentPrompts cannot exceed 1000".to_string());
        }
        if self.palette_rows == 0 {
            return Err("paletteRows must be at least 1".to_string());
        }
        if self.request_timeout_secs == 0 {
            return Err("requestTimeoutSecs must be at least 1 second".to_string());
        }
        if self.request_timeout_secs > MAX_REQUEST_TIMEOUT_SECS {
            return Err(format!(
                "requestTimeoutSecs cannot exceed {}",
                MAX_REQUEST_TIMEOUT_SECS
            ));
        }
        if self.default_provider.trim().is_empty() {
            return Err("defaultProvider cannot be empty".to_string());
        }
        Ok(())
    }
}
