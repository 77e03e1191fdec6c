//! Application State
//!
//! Owns every service: configuration, persistent settings, the prompt store
//! and the provider registry. Built once at startup.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use quickprompt_llm::{ChatSession, ChatTransport, HttpTransport};
use tokio::runtime::Handle;

use crate::models::prompt::PlaceholderContext;
use crate::models::settings::{AppSettings, SettingsUpdate};
use crate::services::llm::ProviderRegistry;
use crate::services::prompts::{PaletteController, PromptStore};
use crate::services::streaming::StreamCoordinator;
use crate::storage::{ConfigService, SettingsStore, DEFAULT_IDENTITY};
use crate::utils::error::AppResult;
use crate::utils::paths::{ensure_app_config_dir, settings_path};

/// Application state
pub struct AppState {
    config: ConfigService,
    settings: SettingsStore,
    prompts: PromptStore,
    registry: ProviderRegistry,
    transport: Arc<dyn ChatTransport>,
}

impl AppState {
    /// Initialize from the platform config directory with the HTTP transport
    pub fn initialize() -> AppResult<Self> {
        let dir = ensure_app_config_dir()?;
        let transport: Arc<dyn ChatTransport> = Arc::new(HttpTransport::with_defaults()?);
        Self::load_from_dir(&dir, transport)
    }

    /// Initialize from an explicit config directory
    pub fn load_from_dir(dir: &Path, transport: Arc<dyn ChatTransport>) -> AppResult<Self> {
        let config = ConfigService::load_from_dir(dir)?;
        let settings = SettingsStore::open(settings_path(dir), DEFAULT_IDENTITY)?;
        Self::from_parts(config, settings, transport)
    }

    pub fn from_parts(
        config: ConfigService,
        settings: SettingsStore,
        transport: Arc<dyn ChatTransport>,
    ) -> AppResult<Self> {
        let prompts = Self::build_store(&config, settings.get())?;
        let registry = Self::build_registry(&config, settings.get(), Arc::clone(&transport))?;
        tracing::info!(
            "[AppState] Initialized with {} prompts, default provider '{}'",
            prompts.len(),
            settings.get().default_provider
        );
        Ok(Self {
            config,
            settings,
            prompts,
            registry,
            transport,
        })
    }

    fn build_store(config: &ConfigService, settings: &AppSettings) -> AppResult<PromptStore> {
        Ok(PromptStore::load(
            config.get_config().prompts.clone(),
            settings.mru_commands.clone(),
            settings.num_recent_prompts,
        )?)
    }

    fn build_registry(
        config: &ConfigService,
        settings: &AppSettings,
        transport: Arc<dyn ChatTransport>,
    ) -> AppResult<ProviderRegistry> {
        ProviderRegistry::from_config(
            config.get_config(),
            transport,
            Some(Duration::from_secs(settings.request_timeout_secs)),
        )
    }

    pub fn prompts(&self) -> &PromptStore {
        &self.prompts
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub fn settings(&self) -> &AppSettings {
        self.settings.get()
    }

    /// Open the palette over the prompt store. Call `persist_mru` after a
    /// commit.
    pub fn palette(&mut self) -> PaletteController<'_> {
        let rows = self.settings.get().palette_rows;
        PaletteController::open(&mut self.prompts, rows)
    }

    /// Record a selection and save the MRU list
    pub fn select_prompt(&mut self, name: &str) -> AppResult<()> {
        self.prompts.select_prompt(name)?;
        self.persist_mru()
    }

    pub fn persist_mru(&mut self) -> AppResult<()> {
        self.settings.set_mru(self.prompts.mru())
    }

    /// Render a prompt with the clipboard text and today's date
    pub fn render_prompt(&self, name: &str, clipboard: &str) -> AppResult<String> {
        Ok(self
            .prompts
            .render(name, &PlaceholderContext::standard(clipboard))?)
    }

    /// New chat session; `None` picks the default provider
    pub fn open_session(&self, provider: Option<&str>) -> AppResult<ChatSession> {
        let name = provider.unwrap_or(&self.settings.get().default_provider);
        self.registry.session(name)
    }

    /// Coordinator over a new session for `provider`
    pub fn coordinator(&self, provider: Option<&str>, runtime: Handle) -> AppResult<StreamCoordinator> {
        let session = self.open_session(provider)?;
        Ok(StreamCoordinator::new(session, runtime).with_echo_query(self.settings.get().echo_query))
    }

    /// Apply a settings update, rebuilding what depends on it
    pub fn update_settings(&mut self, update: SettingsUpdate) -> AppResult<AppSettings> {
        let mut update = update;
        // Keep the in-memory MRU authoritative
        if update.mru_commands.is_none() {
            update.mru_commands = Some(self.prompts.mru().to_vec());
        }
        let settings = self.settings.update(update)?;
        self.prompts = Self::build_store(&self.config, &settings)?;
        self.registry = Self::build_registry(&self.config, &settings, Arc::clone(&self.transport))?;
        Ok(settings)
    }

    /// Re-read the configuration files
    pub fn reload_config(&mut self) -> AppResult<()> {
        self.persist_mru()?;
        self.config.reload()?;
        self.prompts = Self::build_store(&self.config, self.settings.get())?;
        self.registry =
            Self::build_registry(&self.config, self.settings.get(), Arc::clone(&self.transport))?;
        tracing::info!("[AppState] Configuration reloaded");
        Ok(())
    }
}
