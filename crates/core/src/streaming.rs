//! Stream Event Types
//!
//! Provider-agnostic events produced while decoding a streamed completion, and
//! the adapter trait that turns one provider's event payloads into them. The
//! SSE framing itself lives in the LLM crate; adapters only ever see the
//! `data` field of a single event.

use serde::{Deserialize, Serialize};

/// Event produced by a provider adapter for one inbound SSE payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// Incremental text fragment from the model
    TextDelta { content: String },

    /// The provider reported why generation stopped. Informational only: the
    /// stream keeps going until the terminal sentinel or the end of the body.
    Finished { stop_reason: String },

    /// The provider reported an error inside the stream body
    Error { message: String },

    /// Terminal sentinel (`[DONE]`)
    Done,
}

impl StreamEvent {
    /// Whether this event ends the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::Done | StreamEvent::Error { .. })
    }
}

/// Errors that can occur while adapting a single stream payload.
///
/// These never abort a stream: the session logs them and skips the event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum AdapterError {
    /// Invalid format that couldn't be parsed
    InvalidFormat(String),
    /// JSON/data parsing error
    ParseError(String),
}

impl std::fmt::Display for AdapterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdapterError::InvalidFormat(msg) => write!(f, "Invalid format: {}", msg),
            AdapterError::ParseError(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for AdapterError {}

/// Trait for adapting provider-specific payloads to stream events.
///
/// A single payload may produce zero, one, or multiple events.
pub trait StreamAdapter: Send + Sync {
    /// Returns the provider name for logging and identification.
    fn provider_name(&self) -> &'static str;

    /// Adapt the `data` field of one SSE event.
    fn adapt(&mut self, data: &str) -> Result<Vec<StreamEvent>, AdapterError>;

    /// Reset adapter state for a new stream.
    fn reset(&mut self) {}
}
