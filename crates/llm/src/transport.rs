//! Chat Transport
//!
//! The seam between a `ChatSession` and the network. `HttpTransport` posts the
//! request with reqwest and hands back the raw SSE body; tests substitute a
//! scripted transport.

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::{Stream, StreamExt};

use crate::http_client::build_http_client;
use crate::provider::parse_http_error;
use crate::types::{ChatRequest, LlmError, LlmResult};

/// Raw body of a streaming response. Dropping it aborts the request.
pub type ByteStream = Pin<Box<dyn Stream<Item = LlmResult<Bytes>> + Send>>;

/// Opens streaming completion requests.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send the request and return the response body once headers arrive.
    ///
    /// Non-success HTTP statuses are reported as errors here, before any
    /// body bytes are handed out.
    async fn open(&self, request: &ChatRequest) -> LlmResult<ByteStream>;
}

/// reqwest-backed transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Build a transport with a fresh client using the default connect timeout.
    pub fn with_defaults() -> LlmResult<Self> {
        Ok(Self::new(build_http_client(None)?))
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn open(&self, request: &ChatRequest) -> LlmResult<ByteStream> {
        tracing::debug!(
            "[HttpTransport] POST {} (provider={}, model={}, messages={})",
            request.endpoint,
            request.provider,
            request.model,
            request.messages.len()
        );

        let response = self
            .client
            .post(&request.endpoint)
            .header("Authorization", format!("Bearer {}", request.api_key))
            .header("Accept", "text/event-stream")
            .header("Content-Type", "application/json")
            .json(&request.body())
            .send()
            .await
            .map_err(|e| LlmError::network(e.to_string()))?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            let body_text = response.text().await.map_err(|e| LlmError::network(e.to_string()))?;
            return Err(parse_http_error(status, &body_text, &request.provider));
        }

        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(|e| LlmError::network(e.to_string())));
        Ok(Box::pin(body))
    }
}
