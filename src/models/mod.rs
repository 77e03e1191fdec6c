//! Data Models
//!
//! Contains all data structures used throughout the application.

pub mod config;
pub mod prompt;
pub mod settings;

pub use config::*;
pub use prompt::*;
pub use settings::*;
