//! Storage Layer
//!
//! Handles all data persistence: TOML configuration and the JSON settings file.

pub mod config;
pub mod settings;

pub use config::*;
pub use settings::*;
