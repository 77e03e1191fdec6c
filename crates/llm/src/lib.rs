//! QuickPrompt LLM
//!
//! Streaming client for OpenAI-compatible chat-completions endpoints:
//! - Provider profiles (endpoint, default model, key name) as plain data
//! - Server-sent-event decoding and the chat-completions stream adapter
//! - A pluggable transport (`ChatTransport`) with a reqwest implementation
//! - `ChatSession`, which keeps conversation history and yields fragments

pub mod http_client;
pub mod provider;
pub mod session;
pub mod sse;
pub mod streaming_adapters;
pub mod transport;
pub mod types;

// Re-export main types
pub use http_client::build_http_client;
pub use provider::ProviderProfile;
pub use session::{ChatSession, Turn};
pub use sse::{SseDecoder, SseEvent};
pub use streaming_adapters::OpenAIAdapter;
pub use transport::{ByteStream, ChatTransport, HttpTransport};
pub use types::*;
