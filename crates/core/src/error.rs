//! Core Error Types
//!
//! Error kinds raised by the prompt layer: configuration problems, unknown
//! prompt names and template substitution failures. These stay dependency-free
//! (thiserror only) so every crate in the workspace can share them.

use thiserror::Error;

/// Core error type for the QuickPrompt workspace.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Malformed or missing required configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unknown prompt name (or other keyed lookup)
    #[error("Not found: {0}")]
    NotFound(String),

    /// A template references a placeholder absent from the render context
    #[error("Missing placeholder '{placeholder}' in template '{template}'")]
    MissingPlaceholder { template: String, placeholder: String },

    /// Parse errors
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Result type alias for core errors
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a missing placeholder error
    pub fn missing_placeholder(template: impl Into<String>, placeholder: impl Into<String>) -> Self {
        Self::MissingPlaceholder {
            template: template.into(),
            placeholder: placeholder.into(),
        }
    }

    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}
