//! QuickPrompt Core
//!
//! Foundational error types and the stream adapter abstraction shared by the
//! QuickPrompt workspace. This crate depends on nothing else in the workspace.
//!
//! ## Module Organization
//!
//! - `error` - Core error types (`CoreError`, `CoreResult`)
//! - `streaming` - Provider-agnostic stream events and the `StreamAdapter` trait

pub mod error;
pub mod streaming;

// ── Error Types ────────────────────────────────────────────────────────
pub use error::{CoreError, CoreResult};

// ── Streaming Types ────────────────────────────────────────────────────
pub use streaming::{AdapterError, StreamAdapter, StreamEvent};
