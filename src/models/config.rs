//! Configuration Models
//!
//! Provider credentials and prompt templates, read from TOML. The built-in
//! defaults form the system layer; the user's config.toml is merged on top.

use serde::{Deserialize, Serialize};
use url::Url;

use quickprompt_llm::ProviderProfile;

use crate::models::prompt::PromptTemplate;

/// One `[[providers]]` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderEntry {
    pub name: String,
    /// Static API key; blank until the user fills it in
    #[serde(default)]
    pub api_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

impl ProviderEntry {
    pub fn blank(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            api_key: String::new(),
            model: None,
            endpoint: None,
        }
    }

    fn from_profile(profile: &ProviderProfile) -> Self {
        Self {
            name: profile.name.clone(),
            api_key: String::new(),
            model: Some(profile.default_model.clone()),
            endpoint: Some(profile.endpoint.clone()),
        }
    }

    /// Overlay the non-empty values of `other`
    fn merge_from(&mut self, other: &ProviderEntry) {
        if !other.api_key.trim().is_empty() {
            self.api_key = other.api_key.clone();
        }
        if let Some(model) = non_blank(&other.model) {
            self.model = Some(model.to_string());
        }
        if let Some(endpoint) = non_blank(&other.endpoint) {
            self.endpoint = Some(endpoint.to_string());
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Contents of a QuickPrompt TOML configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickPromptConfig {
    #[serde(default)]
    pub providers: Vec<ProviderEntry>,
    #[serde(default)]
    pub prompts: Vec<PromptTemplate>,
}

impl QuickPromptConfig {
    /// Built-in system configuration
    pub fn defaults() -> Self {
        Self {
            providers: ProviderProfile::builtin()
                .iter()
                .map(ProviderEntry::from_profile)
                .collect(),
            prompts: default_prompts(),
        }
    }

    /// Skeleton written to config.toml the first time: one blank key per
    /// built-in provider and no prompt overrides
    pub fn user_template() -> Self {
        Self {
            providers: ProviderProfile::builtin()
                .iter()
                .map(|p| ProviderEntry::blank(p.name.clone()))
                .collect(),
            prompts: Vec::new(),
        }
    }

    /// Merge a user layer on top of this one.
    ///
    /// Providers merge by name with non-empty user values winning; prompts
    /// merge by name with the user's template replacing the system one. Names
    /// only the user defines are appended in the user's order.
    pub fn merged(mut self, user: &QuickPromptConfig) -> Self {
        for entry in &user.providers {
            match self.providers.iter_mut().find(|p| p.name == entry.name) {
                Some(existing) => existing.merge_from(entry),
                None => self.providers.push(entry.clone()),
            }
        }
        for prompt in &user.prompts {
            match self.prompts.iter_mut().find(|p| p.name == prompt.name) {
                Some(existing) => existing.template = prompt.template.clone(),
                None => self.prompts.push(prompt.clone()),
            }
        }
        self
    }

    pub fn provider(&self, name: &str) -> Option<&ProviderEntry> {
        self.providers.iter().find(|p| p.name == name)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        for (i, provider) in self.providers.iter().enumerate() {
            if provider.name.trim().is_empty() {
                return Err(format!("providers[{}] has an empty name", i));
            }
            if self.providers[..i].iter().any(|p| p.name == provider.name) {
                return Err(format!("duplicate provider '{}'", provider.name));
            }
            if let Some(endpoint) = non_blank(&provider.endpoint) {
                let url = Url::parse(endpoint).map_err(|e| {
                    format!("provider '{}' has an invalid endpoint: {}", provider.name, e)
                })?;
                if !matches!(url.scheme(), "http" | "https") {
                    return Err(format!(
                        "provider '{}' endpoint must use http or https",
                        provider.name
                    ));
                }
            }
        }
        for (i, prompt) in self.prompts.iter().enumerate() {
            if prompt.name.trim().is_empty() {
                return Err(format!("prompts[{}] has an empty name", i));
            }
            if self.prompts[..i].iter().any(|p| p.name == prompt.name) {
                return Err(format!("duplicate prompt '{}'", prompt.name));
            }
        }
        Ok(())
    }
}

fn default_prompts() -> Vec<PromptTemplate> {
    vec![
        PromptTemplate::new(
            "define",
            "Please explain any challenging or unusual terms in the following passage.\n\
             YOU MUST respond using the same language as the one that the passage is written in.\n\
             Passage:\n\
             {clipboard}\n",
        ),
        PromptTemplate::new(
            "translate",
            "Translate the following passage to english:\n{clipboard}",
        ),
        PromptTemplate::new(
            "fun fact",
            "Today is {date}.\n\
             What is something fun and lighthearted that happened on this day in the past?",
        ),
    ]
}
