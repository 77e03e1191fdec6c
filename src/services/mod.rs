//! Services
//!
//! Business logic for the application: prompts and the palette, provider
//! wiring, and streaming.

pub mod llm;
pub mod prompts;
pub mod streaming;

pub use llm::ProviderRegistry;
pub use prompts::{FuzzyMatcher, PaletteController, PaletteItem, PromptStore};
pub use streaming::{StreamCoordinator, StreamObserver, StreamState, StreamUpdate};
