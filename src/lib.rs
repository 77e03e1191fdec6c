//! QuickPrompt - Library
//!
//! Backend of the QuickPrompt launcher:
//! - Prompt templates with most-recently-used tracking and fuzzy ranking
//! - The palette state machine built on them
//! - Background streaming of chat answers with cancellation
//! - Storage layer (TOML config, JSON settings) and utilities

pub mod models;
pub mod services;
pub mod state;
pub mod storage;
pub mod utils;

pub use models::config::{ProviderEntry, QuickPromptConfig};
pub use models::prompt::{PlaceholderContext, PromptTemplate};
pub use models::settings::{AppSettings, SettingsUpdate};
pub use state::AppState;
pub use utils::error::{AppError, AppResult};
