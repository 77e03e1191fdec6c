//! TOML Configuration Management
//!
//! Two layers live in the app config directory:
//! - `defaults.toml`, rewritten from the built-in defaults on every load so it
//!   always documents the current system configuration
//! - `config.toml`, the user's file, created once with blank API keys
//!
//! The effective configuration is the user layer merged over the defaults.

use std::fs;
use std::path::{Path, PathBuf};

use crate::models::config::QuickPromptConfig;
use crate::utils::error::{AppError, AppResult};
use crate::utils::paths::{defaults_path, ensure_app_config_dir, ensure_dir, user_config_path};

const DEFAULTS_HEADER: &str = "# QuickPrompt system defaults.\n\
# This file is regenerated on every start; edit config.toml instead.\n\n";

const USER_HEADER: &str = "# QuickPrompt user configuration.\n\
# Fill in api_key for the providers you use. Entries here override\n\
# defaults.toml by name; add [[prompts]] tables to define your own templates.\n\n";

/// Configuration service for providers and prompt templates
#[derive(Debug)]
pub struct ConfigService {
    dir: PathBuf,
    config: QuickPromptConfig,
}

impl ConfigService {
    /// Load configuration from the platform config directory
    pub fn new() -> AppResult<Self> {
        let dir = ensure_app_config_dir()?;
        Self::load_from_dir(&dir)
    }

    /// Load configuration from an explicit directory
    pub fn load_from_dir(dir: &Path) -> AppResult<Self> {
        ensure_dir(dir)?;
        let config = Self::load_layers(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
            config,
        })
    }

    fn load_layers(dir: &Path) -> AppResult<QuickPromptConfig> {
        let system = QuickPromptConfig::defaults();
        Self::save_to_file(&defaults_path(dir), &system, DEFAULTS_HEADER)?;

        let user_path = user_config_path(dir);
        let user = if user_path.exists() {
            Self::load_from_file(&user_path)?
        } else {
            let template = QuickPromptConfig::user_template();
            Self::save_to_file(&user_path, &template, USER_HEADER)?;
            tracing::info!("[ConfigService] Created {}", user_path.display());
            template
        };

        let merged = system.merged(&user);
        merged.validate().map_err(AppError::config)?;
        tracing::info!(
            "[ConfigService] Loaded {} providers and {} prompts from {}",
            merged.providers.len(),
            merged.prompts.len(),
            dir.display()
        );
        Ok(merged)
    }

    /// Load one configuration file
    fn load_from_file(path: &Path) -> AppResult<QuickPromptConfig> {
        let content = fs::read_to_string(path)?;
        let config: QuickPromptConfig = toml::from_str(&content).map_err(|e| {
            AppError::config(format!("{} is not valid TOML: {}", path.display(), e))
        })?;
        config
            .validate()
            .map_err(|e| AppError::config(format!("{}: {}", path.display(), e)))?;
        Ok(config)
    }

    /// Save one configuration file with a comment header
    fn save_to_file(path: &Path, config: &QuickPromptConfig, header: &str) -> AppResult<()> {
        let body = toml::to_string_pretty(config)?;
        fs::write(path, format!("{}{}", header, body))?;
        Ok(())
    }

    /// Get the effective configuration
    pub fn get_config(&self) -> &QuickPromptConfig {
        &self.config
    }

    /// Re-read both layers from disk
    pub fn reload(&mut self) -> AppResult<()> {
        self.config = Self::load_layers(&self.dir)?;
        Ok(())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
