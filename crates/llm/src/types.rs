//! LLM Types
//!
//! Conversation messages, the outgoing request shape and the error type used
//! by the chat client.

use serde::{Deserialize, Serialize};

/// Role of a message in the conversation history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

/// A single role-tagged message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// A fully resolved streaming completion request, handed to a `ChatTransport`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    /// Provider name, used in error messages and logs
    pub provider: String,
    pub endpoint: String,
    pub api_key: String,
    pub model: String,
    /// Full conversation history, including the new user message
    pub messages: Vec<Message>,
}

impl ChatRequest {
    /// JSON body sent to the chat-completions endpoint
    pub fn body(&self) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "stream": true,
            "messages": self.messages,
        })
    }
}

/// Error types for LLM operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LlmError {
    /// Authentication failed (invalid API key)
    AuthenticationFailed { message: String },
    /// Rate limit exceeded
    RateLimited { message: String },
    /// Model not found or not available
    ModelNotFound { model: String },
    /// Invalid request (bad parameters)
    InvalidRequest { message: String },
    /// Server error from the provider, either as an HTTP status or inside the stream
    ServerError {
        message: String,
        status: Option<u16>,
    },
    /// Network/connection error
    NetworkError { message: String },
    /// The per-request deadline elapsed before the response completed
    Timeout { after_ms: u64 },
    /// Other error
    Other { message: String },
}

impl LlmError {
    /// Create a network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::NetworkError {
            message: message.into(),
        }
    }

    /// Whether the error was raised by the network layer rather than the provider.
    pub fn is_network(&self) -> bool {
        matches!(self, LlmError::NetworkError { .. } | LlmError::Timeout { .. })
    }
}

impl std::fmt::Display for LlmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LlmError::AuthenticationFailed { message } => {
                write!(f, "Authentication failed: {}", message)
            }
            LlmError::RateLimited { message } => {
                write!(f, "Rate limited: {}", message)
            }
            LlmError::ModelNotFound { model } => {
                write!(f, "Model not found: {}", model)
            }
            LlmError::InvalidRequest { message } => {
                write!(f, "Invalid request: {}", message)
            }
            LlmError::ServerError { message, status } => {
                if let Some(s) = status {
                    write!(f, "Server error ({}): {}", s, message)
                } else {
                    write!(f, "Server error: {}", message)
                }
            }
            LlmError::NetworkError { message } => {
                write!(f, "Network error: {}", message)
            }
            LlmError::Timeout { after_ms } => {
                write!(f, "Request timed out after {}ms", after_ms)
            }
            LlmError::Other { message } => {
                write!(f, "Error: {}", message)
            }
        }
    }
}

impl std::error::Error for LlmError {}

/// Result type alias for LLM operations
pub type LlmResult<T> = Result<T, LlmError>;
