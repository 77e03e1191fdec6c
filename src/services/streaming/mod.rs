//! Streaming
//!
//! Background driving of chat turns with cancellation and observer fan-out.

pub mod coordinator;

pub use coordinator::{StreamCoordinator, StreamObserver, StreamState, StreamUpdate};
