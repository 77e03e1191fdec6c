//! Provider Registry
//!
//! Built once from configuration and owned by the application state. Hands
//! out a fresh `ChatSession` per provider, all sharing one HTTP transport.

use std::sync::Arc;
use std::time::Duration;

use quickprompt_llm::provider::missing_api_key_error;
use quickprompt_llm::{ChatSession, ChatTransport, ProviderProfile};

use crate::models::config::QuickPromptConfig;
use crate::utils::error::{AppError, AppResult};

#[derive(Debug, Clone)]
struct RegisteredProvider {
    profile: ProviderProfile,
    api_key: String,
}

/// Factory for chat sessions
pub struct ProviderRegistry {
    providers: Vec<RegisteredProvider>,
    transport: Arc<dyn ChatTransport>,
    request_timeout: Option<Duration>,
}

impl ProviderRegistry {
    /// Build profiles for every configured provider.
    ///
    /// Built-in providers take their endpoint and model from the config when
    /// given; other providers must name both.
    pub fn from_config(
        config: &QuickPromptConfig,
        transport: Arc<dyn ChatTransport>,
        request_timeout: Option<Duration>,
    ) -> AppResult<Self> {
        let mut providers = Vec::with_capacity(config.providers.len());

        for entry in &config.providers {
            let endpoint = entry.endpoint.as_deref().filter(|e| !e.trim().is_empty());
            let model = entry.model.as_deref().filter(|m| !m.trim().is_empty());

            let mut profile = match ProviderProfile::builtin_named(&entry.name) {
                Some(profile) => profile,
                None => match (endpoint, model) {
                    (Some(endpoint), Some(model)) => {
                        ProviderProfile::new(entry.name.clone(), endpoint, model)
                    }
                    _ => {
                        return Err(AppError::config(format!(
                            "provider '{}' needs both an endpoint and a model",
                            entry.name
                        )))
                    }
                },
            };
            if let Some(endpoint) = endpoint {
                profile = profile.with_endpoint(endpoint);
            }
            if let Some(model) = model {
                profile = profile.with_default_model(model);
            }
            profile.validate().map_err(AppError::config)?;

            providers.push(RegisteredProvider {
                profile,
                api_key: entry.api_key.trim().to_string(),
            });
        }

        tracing::info!(
            "[ProviderRegistry] Registered providers: {}",
            providers
                .iter()
                .map(|p| p.profile.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(Self {
            providers,
            transport,
            request_timeout,
        })
    }

    fn find(&self, name: &str) -> AppResult<&RegisteredProvider> {
        self.providers
            .iter()
            .find(|p| p.profile.name == name)
            .ok_or_else(|| AppError::config(format!("unknown provider '{}'", name)))
    }

    /// New session for `name` with empty history
    pub fn session(&self, name: &str) -> AppResult<ChatSession> {
        let provider = self.find(name)?;
        if provider.api_key.is_empty() {
            return Err(AppError::config(format!(
                "{}; set api_key for '{}' in config.toml",
                missing_api_key_error(&provider.profile.key_name),
                name
            )));
        }

        let mut session = ChatSession::new(
            provider.profile.clone(),
            provider.api_key.clone(),
            Arc::clone(&self.transport),
        );
        if let Some(timeout) = self.request_timeout {
            session = session.with_request_timeout(timeout);
        }
        Ok(session)
    }

    pub fn profile(&self, name: &str) -> Option<&ProviderProfile> {
        self.find(name).ok().map(|p| &p.profile)
    }

    /// Provider names in configuration order
    pub fn providers(&self) -> Vec<&str> {
        self.providers
            .iter()
            .map(|p| p.profile.name.as_str())
            .collect()
    }

    pub fn has_key(&self, name: &str) -> bool {
        self.find(name).is_ok_and(|p| !p.api_key.is_empty())
    }
}
