//! Integration Tests Module
//!
//! End-to-end tests for QuickPrompt: prompt store and palette behaviour,
//! application state persistence, and streamed chat through the coordinator
//! against scripted SSE transports.

// Shared scripted transports and observers
mod support;

// Prompt store and MRU properties
mod prompt_store_test;

// Palette flow over the application state
mod palette_test;

// Chat session and stream coordinator tests
mod chat_stream_test;

// Settings bounds, configuration reload and stream failure reporting
mod settings_test;
