//! Prompt Services
//!
//! Template store with MRU tracking, fuzzy ranking and the palette state
//! machine built on both.

pub mod fuzzy;
pub mod palette;
pub mod store;
pub mod template;

pub use fuzzy::FuzzyMatcher;
pub use palette::{PaletteController, PaletteItem};
pub use store::PromptStore;
pub use template::ParsedTemplate;
