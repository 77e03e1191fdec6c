//! Chat Session
//!
//! One continuing exchange with one chat-completions endpoint. A session owns
//! its conversation history; each call to [`ChatSession::ask`] starts a new
//! turn that streams the reply back fragment by fragment.
//!
//! History changes only at turn boundaries: the user message is appended when
//! the turn starts and the assistant reply when it completes. A turn that
//! fails, times out or is dropped early restores the history it started from.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use futures_util::{Stream, StreamExt};
use quickprompt_core::streaming::{StreamAdapter, StreamEvent};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::provider::ProviderProfile;
use crate::sse::{SseDecoder, SseEvent};
use crate::streaming_adapters::OpenAIAdapter;
use crate::transport::{ByteStream, ChatTransport};
use crate::types::{ChatRequest, LlmError, LlmResult, Message};

/// A conversation with a single provider endpoint
pub struct ChatSession {
    profile: ProviderProfile,
    model: String,
    api_key: String,
    transport: Arc<dyn ChatTransport>,
    history: Vec<Message>,
    request_timeout: Option<Duration>,
}

impl ChatSession {
    /// Create a session using the profile's default model.
    pub fn new(
        profile: ProviderProfile,
        api_key: impl Into<String>,
        transport: Arc<dyn ChatTransport>,
    ) -> Self {
        Self {
            model: profile.default_model.clone(),
            profile,
            api_key: api_key.into(),
            transport,
            history: Vec::new(),
            request_timeout: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Bound every turn by a deadline measured from the start of the turn.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn profile(&self) -> &ProviderProfile {
        &self.profile
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }

    /// Conversation so far, oldest first
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Start a new turn.
    ///
    /// Nothing is sent until the first call to [`Turn::next_fragment`].
    /// A timeout too large to represent as an instant means no deadline.
    pub fn ask(&mut self, content: impl Into<String>) -> Turn<'_> {
        let deadline = self
            .request_timeout
            .and_then(|timeout| Instant::now().checked_add(timeout));
        let base_len = self.history.len();
        self.history.push(Message::user(content));

        Turn {
            session: self,
            base_len,
            phase: TurnPhase::Sending,
            body: None,
            decoder: SseDecoder::new(),
            adapter: OpenAIAdapter::new(),
            pending: VecDeque::new(),
            abort: None,
            reply: String::new(),
            deadline,
            decode_failures: 0,
        }
    }

    fn request(&self) -> ChatRequest {
        ChatRequest {
            provider: self.profile.name.clone(),
            endpoint: self.profile.endpoint.clone(),
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            messages: self.history.clone(),
        }
    }
}

impl std::fmt::Debug for ChatSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSession")
            .field("provider", &self.profile.name)
            .field("model", &self.model)
            .field("history_len", &self.history.len())
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TurnPhase {
    /// Request not opened yet
    Sending,
    /// Reading the response body
    Streaming,
    /// Sentinel or end of body seen; queued fragments remain to be handed out
    Draining,
    Completed,
    Failed,
}

/// One request/response exchange: a finite, non-restartable lazy sequence of
/// text fragments.
pub struct Turn<'a> {
    session: &'a mut ChatSession,
    /// History length before this turn's user message
    base_len: usize,
    phase: TurnPhase,
    body: Option<ByteStream>,
    decoder: SseDecoder,
    adapter: OpenAIAdapter,
    pending: VecDeque<String>,
    /// Error reported inside the stream, surfaced after queued fragments
    abort: Option<LlmError>,
    reply: String,
    deadline: Option<Instant>,
    decode_failures: usize,
}

impl<'a> Turn<'a> {
    /// Pull the next fragment.
    ///
    /// Returns `None` once the turn has completed (history now holds the
    /// assistant reply) or after an error has been returned.
    pub async fn next_fragment(&mut self) -> Option<LlmResult<String>> {
        let Some(deadline) = self.deadline else {
            return self.advance().await;
        };

        match tokio::time::timeout_at(deadline, self.advance()).await {
            Ok(item) => item,
            Err(_) => {
                let after_ms = self
                    .session
                    .request_timeout
                    .map(|t| t.as_millis() as u64)
                    .unwrap_or_default();
                Some(Err(self.fail(LlmError::Timeout { after_ms })))
            }
        }
    }

    /// Consume the turn as a `Stream` of fragments.
    pub fn into_stream(self) -> impl Stream<Item = LlmResult<String>> + 'a {
        futures_util::stream::unfold(self, |mut turn| async move {
            turn.next_fragment().await.map(|item| (item, turn))
        })
    }

    /// Number of events that could not be decoded and were skipped
    pub fn decode_failures(&self) -> usize {
        self.decode_failures
    }

    /// Text received so far
    pub fn reply(&self) -> &str {
        &self.reply
    }

    pub fn is_complete(&self) -> bool {
        self.phase == TurnPhase::Completed
    }

    async fn advance(&mut self) -> Option<LlmResult<String>> {
        loop {
            if let Some(fragment) = self.pending.pop_front() {
                return Some(Ok(fragment));
            }
            if let Some(err) = self.abort.take() {
                return Some(Err(self.fail(err)));
            }

            match self.phase {
                TurnPhase::Completed | TurnPhase::Failed => return None,
                TurnPhase::Draining => {
                    self.complete();
                    return None;
                }
                TurnPhase::Sending => {
                    let transport = Arc::clone(&self.session.transport);
                    let request = self.session.request();
                    match transport.open(&request).await {
                        Ok(body) => {
                            self.body = Some(body);
                            self.phase = TurnPhase::Streaming;
                        }
                        Err(err) => return Some(Err(self.fail(err))),
                    }
                }
                TurnPhase::Streaming => {
                    let chunk = match self.body.as_mut() {
                        Some(body) => body.next().await,
                        None => None,
                    };
                    match chunk {
                        Some(Ok(bytes)) => {
                            let events = self.decoder.feed(&bytes);
                            self.handle_events(events);
                        }
                        Some(Err(err)) => return Some(Err(self.fail(err))),
                        None => {
                            let tail = self.decoder.finish();
                            self.handle_events(tail.into_iter().collect());
                            if self.phase == TurnPhase::Streaming {
                                debug!(
                                    "[ChatSession] {} body ended without a [DONE] sentinel",
                                    self.session.profile.name
                                );
                                self.phase = TurnPhase::Draining;
                            }
                        }
                    }
                }
            }
        }
    }

    fn handle_events(&mut self, events: Vec<SseEvent>) {
        for event in events {
            if self.phase != TurnPhase::Streaming {
                break;
            }
            match self.adapter.adapt(&event.data) {
                Ok(stream_events) => {
                    for stream_event in stream_events {
                        match stream_event {
                            StreamEvent::TextDelta { content } => {
                                self.reply.push_str(&content);
                                self.pending.push_back(content);
                            }
                            StreamEvent::Finished { stop_reason } => {
                                debug!(
                                    "[ChatSession] {} finished: {}",
                                    self.session.profile.name, stop_reason
                                );
                            }
                            StreamEvent::Error { message } => {
                                self.abort = Some(LlmError::ServerError {
                                    message,
                                    status: None,
                                });
                                self.phase = TurnPhase::Draining;
                                break;
                            }
                            StreamEvent::Done => {
                                self.phase = TurnPhase::Draining;
                                break;
                            }
                        }
                    }
                }
                Err(e) => {
                    self.decode_failures += 1;
                    warn!(
                        "[ChatSession] Failed to decode {} event: {} (data: {})",
                        self.adapter.provider_name(),
                        e,
                        event.data
                    );
                }
            }
        }
    }

    fn complete(&mut self) {
        self.phase = TurnPhase::Completed;
        self.body = None;
        self.session
            .history
            .push(Message::assistant(self.reply.clone()));
        info!(
            "[ChatSession] {} turn complete ({} chars, {} decode failures)",
            self.session.profile.name,
            self.reply.len(),
            self.decode_failures
        );
    }

    fn fail(&mut self, err: LlmError) -> LlmError {
        warn!("[ChatSession] {} turn failed: {}", self.session.profile.name, err);
        self.phase = TurnPhase::Failed;
        self.body = None;
        self.pending.clear();
        self.abort = None;
        self.session.history.truncate(self.base_len);
        err
    }
}

impl Drop for Turn<'_> {
    fn drop(&mut self) {
        if self.phase != TurnPhase::Completed {
            self.session.history.truncate(self.base_len);
        }
    }
}
