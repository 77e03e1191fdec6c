//! LLM Services
//!
//! Application-side wiring of chat providers.

pub mod registry;

pub use registry::ProviderRegistry;
