//! Stream Coordinator
//!
//! Drives one `ChatSession` turn at a time on a Tokio task and republishes the
//! growing answer to an observer. Starting a new query cancels the previous
//! one; after `cancel()` returns, the cancelled stream makes no further
//! observer calls.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use quickprompt_llm::{ChatSession, LlmError};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Receives the output of one stream.
///
/// Calls for a stream are serialised. Implementations must not call back
/// into the coordinator that drives them.
pub trait StreamObserver: Send + Sync {
    /// Full text so far (echo prefix plus every fragment received)
    fn on_update(&self, text: &str);
    fn on_done(&self);
    fn on_error(&self, error: &LlmError);
}

/// Observer callbacks as channel messages
#[derive(Debug, Clone, PartialEq)]
pub enum StreamUpdate {
    Text(String),
    Done,
    Failed(LlmError),
}

impl StreamObserver for mpsc::UnboundedSender<StreamUpdate> {
    fn on_update(&self, text: &str) {
        let _ = self.send(StreamUpdate::Text(text.to_string()));
    }

    fn on_done(&self) {
        let _ = self.send(StreamUpdate::Done);
    }

    fn on_error(&self, error: &LlmError) {
        let _ = self.send(StreamUpdate::Failed(error.clone()));
    }
}

/// Snapshot of the current stream
#[derive(Debug, Clone, PartialEq)]
pub enum StreamState {
    Pending,
    Streaming(String),
    Completed(String),
    Failed(LlmError),
    Cancelled,
}

impl StreamState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, StreamState::Pending | StreamState::Streaming(_))
    }
}

/// Observer calls happen with the gate held; closing it therefore waits out
/// any call in progress.
struct Gate {
    open: bool,
    state: StreamState,
}

struct ActiveStream {
    token: CancellationToken,
    gate: Arc<Mutex<Gate>>,
    task: Option<JoinHandle<()>>,
}

fn lock(gate: &Mutex<Gate>) -> MutexGuard<'_, Gate> {
    gate.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Run `f` if the gate is still open. Returns false once closed.
fn emit(gate: &Mutex<Gate>, f: impl FnOnce(&mut Gate)) -> bool {
    let mut gate = lock(gate);
    if !gate.open {
        return false;
    }
    f(&mut gate);
    true
}

/// Runs chat turns in the background, one at a time
pub struct StreamCoordinator {
    session: Arc<tokio::sync::Mutex<ChatSession>>,
    runtime: Handle,
    echo_query: bool,
    current: Option<ActiveStream>,
}

impl StreamCoordinator {
    pub fn new(session: ChatSession, runtime: Handle) -> Self {
        Self::with_shared_session(Arc::new(tokio::sync::Mutex::new(session)), runtime)
    }

    pub fn with_shared_session(
        session: Arc<tokio::sync::Mutex<ChatSession>>,
        runtime: Handle,
    ) -> Self {
        Self {
            session,
            runtime,
            echo_query: false,
            current: None,
        }
    }

    /// Start every answer with the query in a fenced block and a rule
    pub fn with_echo_query(mut self, echo: bool) -> Self {
        self.echo_query = echo;
        self
    }

    /// Submit `query`.
    ///
    /// The observer receives the initial text (empty, or the echoed query)
    /// before this returns; the rest arrives from a background task.
    pub fn start(&mut self, query: &str, observer: Arc<dyn StreamObserver>) {
        self.cancel();

        let prefix = if self.echo_query {
            format!("```\n{}\n```\n---\n", query)
        } else {
            String::new()
        };
        observer.on_update(&prefix);

        let token = CancellationToken::new();
        let gate = Arc::new(Mutex::new(Gate {
            open: true,
            state: StreamState::Pending,
        }));

        info!("[StreamCoordinator] Starting stream ({} chars)", query.len());
        let worker = self.runtime.spawn(run_stream(
            Arc::clone(&self.session),
            query.to_string(),
            prefix,
            Arc::clone(&observer),
            token.clone(),
            Arc::clone(&gate),
        ));
        let task = self
            .runtime
            .spawn(supervise(worker, observer, Arc::clone(&gate)));

        self.current = Some(ActiveStream {
            token,
            gate,
            task: Some(task),
        });
    }

    /// Stop the current stream. Not an error; the observer hears nothing more.
    pub fn cancel(&mut self) {
        let Some(active) = self.current.as_ref() else {
            return;
        };
        {
            let mut gate = lock(&active.gate);
            if gate.open {
                gate.open = false;
                if !gate.state.is_terminal() {
                    gate.state = StreamState::Cancelled;
                    debug!("[StreamCoordinator] Stream cancelled");
                }
            }
        }
        active.token.cancel();
    }

    /// Whether a stream is still producing output
    pub fn is_active(&self) -> bool {
        self.current.as_ref().is_some_and(|active| {
            let gate = lock(&active.gate);
            gate.open && !gate.state.is_terminal()
        })
    }

    /// State of the most recent stream, if any was started
    pub fn state(&self) -> Option<StreamState> {
        self.current
            .as_ref()
            .map(|active| lock(&active.gate).state.clone())
    }

    /// Wait until the background task of the current stream has exited
    pub async fn wait(&mut self) {
        let task = self.current.as_mut().and_then(|active| active.task.take());
        if let Some(task) = task {
            if let Err(e) = task.await {
                warn!("[StreamCoordinator] Stream task ended abnormally: {}", e);
            }
        }
    }

    pub fn session(&self) -> Arc<tokio::sync::Mutex<ChatSession>> {
        Arc::clone(&self.session)
    }
}

impl Drop for StreamCoordinator {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Turn a worker that panicked or was aborted into a reported failure
async fn supervise(
    worker: JoinHandle<()>,
    observer: Arc<dyn StreamObserver>,
    gate: Arc<Mutex<Gate>>,
) {
    let Err(join_err) = worker.await else {
        return;
    };
    warn!("[StreamCoordinator] Stream task ended abnormally: {}", join_err);
    let err = LlmError::Other {
        message: format!("stream task ended abnormally: {}", join_err),
    };
    emit(&gate, |gate| {
        if !gate.state.is_terminal() {
            gate.state = StreamState::Failed(err.clone());
            observer.on_error(&err);
        }
    });
}

async fn run_stream(
    session: Arc<tokio::sync::Mutex<ChatSession>>,
    query: String,
    prefix: String,
    observer: Arc<dyn StreamObserver>,
    token: CancellationToken,
    gate: Arc<Mutex<Gate>>,
) {
    // A previous turn may still hold the session while it unwinds
    let mut session = tokio::select! {
        biased;
        _ = token.cancelled() => return,
        guard = session.lock_owned() => guard,
    };

    let mut turn = session.ask(query);
    let mut accumulated = prefix;

    loop {
        let next = tokio::select! {
            biased;
            // Dropping the turn aborts the request and restores history
            _ = token.cancelled() => return,
            next = turn.next_fragment() => next,
        };

        match next {
            Some(Ok(fragment)) => {
                accumulated.push_str(&fragment);
                let open = emit(&gate, |gate| {
                    gate.state = StreamState::Streaming(accumulated.clone());
                    observer.on_update(&accumulated);
                });
                if !open {
                    return;
                }
            }
            Some(Err(err)) => {
                emit(&gate, |gate| {
                    gate.state = StreamState::Failed(err.clone());
                    observer.on_error(&err);
                });
                return;
            }
            None => {
                emit(&gate, |gate| {
                    gate.state = StreamState::Completed(accumulated.clone());
                    observer.on_done();
                });
                info!(
                    "[StreamCoordinator] Stream completed ({} chars)",
                    accumulated.len()
                );
                return;
            }
        }
    }
}
