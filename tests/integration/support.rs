//! Test Support
//!
//! Scripted transports that replay SSE bodies, and an observer that records
//! every callback.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use quickprompt::services::streaming::StreamObserver;
use quickprompt_llm::{ByteStream, ChatRequest, ChatTransport, LlmError, LlmResult};

/// SSE event carrying one content delta
pub fn delta(content: &str) -> String {
    format!(
        "data: {}\n\n",
        serde_json::json!({ "choices": [{ "delta": { "content": content } }] })
    )
}

pub const DONE: &str = "data: [DONE]\n\n";

/// Replays `chunks`, pausing `delay` before each, and records requests
pub struct ScriptedTransport {
    chunks: Vec<String>,
    delay: Duration,
    pub requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedTransport {
    pub fn new(chunks: Vec<String>) -> Arc<Self> {
        Self::with_delay(chunks, Duration::ZERO)
    }

    pub fn with_delay(chunks: Vec<String>, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            chunks,
            delay,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatTransport for ScriptedTransport {
    async fn open(&self, request: &ChatRequest) -> LlmResult<ByteStream> {
        self.requests.lock().unwrap().push(request.clone());
        let delay = self.delay;
        let chunks = self.chunks.clone().into_iter();
        Ok(Box::pin(futures_util::stream::unfold(
            chunks,
            move |mut chunks| async move {
                let chunk = chunks.next()?;
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                Some((Ok::<_, LlmError>(Bytes::from(chunk)), chunks))
            },
        )))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Update(String),
    Done,
    Error(LlmError),
}

/// Observer that records every callback in order
#[derive(Default)]
pub struct Recorder {
    calls: Mutex<Vec<Call>>,
}

impl Recorder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

impl StreamObserver for Recorder {
    fn on_update(&self, text: &str) {
        self.calls.lock().unwrap().push(Call::Update(text.to_string()));
    }

    fn on_done(&self) {
        self.calls.lock().unwrap().push(Call::Done);
    }

    fn on_error(&self, error: &LlmError) {
        self.calls.lock().unwrap().push(Call::Error(error.clone()));
    }
}

/// Transport that panics when a request is opened
pub struct PanickingTransport;

#[async_trait]
impl ChatTransport for PanickingTransport {
    async fn open(&self, _request: &ChatRequest) -> LlmResult<ByteStream> {
        panic!("connection pool corrupted");
    }
}
