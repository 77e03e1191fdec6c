//! Provider Profiles
//!
//! Every supported provider speaks the same chat-completions protocol; what
//! varies is the endpoint, the default model and the name its API key is
//! stored under. Those live in a `ProviderProfile` record instead of a
//! per-provider client type.

use serde::{Deserialize, Serialize};
use url::Url;

use super::types::LlmError;

/// Default OpenAI API endpoint
pub const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Default Mistral API endpoint
pub const MISTRAL_API_URL: &str = "https://api.mistral.ai/v1/chat/completions";

/// Configuration record for one chat-completions provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderProfile {
    /// Provider name, e.g. "openai"
    pub name: String,
    /// Streaming chat-completions endpoint
    pub endpoint: String,
    /// Model used when the configuration does not pick one
    pub default_model: String,
    /// Name the API key is looked up under
    pub key_name: String,
}

impl ProviderProfile {
    pub fn new(
        name: impl Into<String>,
        endpoint: impl Into<String>,
        default_model: impl Into<String>,
    ) -> Self {
        let name = name.into();
        Self {
            key_name: name.clone(),
            name,
            endpoint: endpoint.into(),
            default_model: default_model.into(),
        }
    }

    pub fn openai() -> Self {
        Self::new("openai", OPENAI_API_URL, "gpt-3.5-turbo")
    }

    pub fn mistral() -> Self {
        Self::new("mistral", MISTRAL_API_URL, "mistral-tiny")
    }

    /// All built-in profiles, in display order.
    pub fn builtin() -> Vec<Self> {
        vec![Self::openai(), Self::mistral()]
    }

    /// Look up a built-in profile by provider name.
    pub fn builtin_named(name: &str) -> Option<Self> {
        Self::builtin().into_iter().find(|p| p.name == name)
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    /// Check that the endpoint is an absolute http(s) URL.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("provider name must not be empty".to_string());
        }
        if self.default_model.trim().is_empty() {
            return Err(format!("{}: model must not be empty", self.name));
        }
        let url = Url::parse(&self.endpoint)
            .map_err(|e| format!("{}: invalid endpoint '{}': {}", self.name, self.endpoint, e))?;
        match url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(format!(
                "{}: unsupported endpoint scheme '{}'",
                self.name, other
            )),
        }
    }
}

/// Helper function to create an error for missing API key
pub fn missing_api_key_error(provider: &str) -> LlmError {
    LlmError::AuthenticationFailed {
        message: format!("API key not configured for {}", provider),
    }
}

/// Helper function to parse HTTP error status codes
pub fn parse_http_error(status: u16, body: &str, provider: &str) -> LlmError {
    match status {
        401 => LlmError::AuthenticationFailed {
            message: format!("{}: Invalid API key", provider),
        },
        403 => LlmError::AuthenticationFailed {
            message: format!("{}: Access denied", provider),
        },
        404 => LlmError::ModelNotFound {
            model: body.to_string(),
        },
        429 => LlmError::RateLimited {
            message: body.to_string(),
        },
        400 => LlmError::InvalidRequest {
            message: body.to_string(),
        },
        500..=599 => LlmError::ServerError {
            message: body.to_string(),
            status: Some(status),
        },
        _ => LlmError::Other {
            message: format!("HTTP {}: {}", status, body),
        },
    }
}
