//! HTTP Client Factory
//!
//! Builds the reqwest client shared by every chat session.

use std::time::Duration;

use crate::types::{LlmError, LlmResult};

/// Connect timeout applied when the caller does not pick one
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Build a `reqwest::Client` for streaming requests.
///
/// Only the connect phase is bounded here. A whole-request timeout would also
/// cut off long streamed bodies, so the per-request deadline is enforced by
/// the session instead.
pub fn build_http_client(connect_timeout: Option<Duration>) -> LlmResult<reqwest::Client> {
    reqwest::Client::builder()
        .connect_timeout(connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT))
        .build()
        .map_err(|e| LlmError::Other {
            message: format!("failed to build HTTP client: {}", e),
        })
}
