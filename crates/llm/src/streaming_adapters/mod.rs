//! Streaming Adapters
//!
//! Provider-specific adapters that convert SSE payloads into `StreamEvent`s.
//! Every supported provider speaks the OpenAI chat-completions format.

mod openai;

pub use openai::OpenAIAdapter;
