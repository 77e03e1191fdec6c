//! OpenAI Chat-Completions Adapter
//!
//! Handles the chat-completions SSE payload format used by OpenAI and by
//! OpenAI-compatible providers (Mistral, local servers).

use quickprompt_core::streaming::{AdapterError, StreamAdapter, StreamEvent};
use serde::Deserialize;

/// Terminal sentinel sent as the last event's data
const DONE_SENTINEL: &str = "[DONE]";

/// Internal event types from the chat-completions SSE format
#[derive(Debug, Deserialize)]
struct ChunkEvent {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    delta: Option<Delta>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Delta {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Adapter for the chat-completions SSE format
#[derive(Debug, Default)]
pub struct OpenAIAdapter {
    /// Set once the sentinel was seen; later payloads are ignored
    done: bool,
}

impl OpenAIAdapter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StreamAdapter for OpenAIAdapter {
    fn provider_name(&self) -> &'static str {
        "openai"
    }

    fn adapt(&mut self, data: &str) -> Result<Vec<StreamEvent>, AdapterError> {
        if self.done {
            return Ok(vec![]);
        }

        let trimmed = data.trim();
        if trimmed.is_empty() {
            return Err(AdapterError::InvalidFormat("empty event data".to_string()));
        }
        if trimmed == DONE_SENTINEL {
            self.done = true;
            return Ok(vec![StreamEvent::Done]);
        }

        let event: ChunkEvent =
            serde_json::from_str(trimmed).map_err(|e| AdapterError::ParseError(e.to_string()))?;

        if let Some(error) = event.error {
            return Ok(vec![StreamEvent::Error {
                message: error
                    .message
                    .unwrap_or_else(|| "provider reported an error".to_string()),
            }]);
        }

        let mut events = vec![];

        // Only the first choice is rendered
        if let Some(choice) = event.choices.into_iter().next() {
            if let Some(content) = choice.delta.and_then(|d| d.content) {
                if !content.is_empty() {
                    events.push(StreamEvent::TextDelta { content });
                }
            }
            if let Some(stop_reason) = choice.finish_reason {
                events.push(StreamEvent::Finished { stop_reason });
            }
        }

        Ok(events)
    }

    fn reset(&mut self) {
        self.done = false;
    }
}
