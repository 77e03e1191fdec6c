//! Chat Streaming Integration Tests
//!
//! `ChatSession` turns and the `StreamCoordinator` driven end to end over
//! scripted SSE bodies, plus the coordinator built from application state.

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use quickprompt::services::streaming::{StreamCoordinator, StreamState};
use quickprompt::utils::paths::user_config_path;
use quickprompt::AppState;
use quickprompt_llm::{ChatSession, LlmError, Message, MessageRole, ProviderProfile};
use tokio::runtime::Handle;

use crate::support::{delta, Call, Recorder, ScriptedTransport, DONE};

fn hello_body() -> Vec<String> {
    vec![delta("Hel"), delta("lo"), DONE.to_string()]
}

// ============================================================================
// ChatSession Tests
// ============================================================================

#[tokio::test]
async fn test_turn_yields_fragments_and_records_reply() {
    let transport = ScriptedTransport::new(hello_body());
    let mut session = ChatSession::new(ProviderProfile::openai(), "sk-test", transport.clone());

    let fragments: Vec<String> = session
        .ask("Say hello")
        .into_stream()
        .map(|r| r.unwrap())
        .collect()
        .await;

    assert_eq!(fragments, vec!["Hel", "lo"]);
    let history = session.history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].role, MessageRole::Assistant);
    assert_eq!(history[1].content, "Hello");

    let request = transport.requests.lock().unwrap()[0].clone();
    assert_eq!(request.body()["stream"], true);
    assert_eq!(request.body()["messages"][0]["role"], "user");
}

#[tokio::test]
async fn test_malformed_event_between_valid_ones() {
    let transport = ScriptedTransport::new(vec![
        delta("Hel"),
        "data: {\"choices\": [\n\n".to_string(),
        delta("lo"),
        DONE.to_string(),
    ]);
    let mut session = ChatSession::new(ProviderProfile::openai(), "sk-test", transport);

    let mut turn = session.ask("hi");
    let mut fragments = Vec::new();
    while let Some(item) = turn.next_fragment().await {
        fragments.push(item.unwrap());
    }
    assert_eq!(fragments, vec!["Hel", "lo"]);
    assert_eq!(turn.decode_failures(), 1);
}

#[tokio::test]
async fn test_body_split_at_every_byte() {
    let body: String = hello_body().concat();
    let chunks: Vec<String> = body.chars().map(|c| c.to_string()).collect();
    let transport = ScriptedTransport::new(chunks);
    let mut session = ChatSession::new(ProviderProfile::mistral(), "key", transport);

    let fragments: Vec<_> = session.ask("hi").into_stream().collect().await;
    assert_eq!(fragments.len(), 2);
    assert_eq!(session.history()[1], Message::assistant("Hello"));
}

#[tokio::test]
async fn test_timeout_leaves_history_unchanged() {
    let transport = ScriptedTransport::with_delay(hello_body(), Duration::from_millis(200));
    let mut session = ChatSession::new(ProviderProfile::openai(), "sk-test", transport)
        .with_request_timeout(Duration::from_millis(50));

    let items: Vec<_> = session.ask("hi").into_stream().collect().await;
    assert_eq!(items, vec![Err(LlmError::Timeout { after_ms: 50 })]);
    assert!(session.history().is_empty());
}

// ============================================================================
// StreamCoordinator Tests
// ============================================================================

fn coordinator(transport: Arc<ScriptedTransport>) -> StreamCoordinator {
    let session = ChatSession::new(ProviderProfile::openai(), "sk-test", transport);
    StreamCoordinator::new(session, Handle::current())
}

#[tokio::test]
async fn test_start_then_cancel_emits_only_initial_update() {
    let transport = ScriptedTransport::with_delay(hello_body(), Duration::from_millis(10));
    let mut coordinator = coordinator(transport);
    let recorder = Recorder::new();

    coordinator.start("hi", recorder.clone());
    coordinator.cancel();
    coordinator.wait().await;

    assert_eq!(recorder.calls(), vec![Call::Update(String::new())]);
    assert_eq!(coordinator.state(), Some(StreamState::Cancelled));
}

#[tokio::test]
async fn test_new_query_replaces_active_stream() {
    let transport = ScriptedTransport::with_delay(hello_body(), Duration::from_millis(20));
    let mut coordinator = coordinator(transport.clone());
    let first = Recorder::new();
    let second = Recorder::new();

    coordinator.start("first", first.clone());
    tokio::time::sleep(Duration::from_millis(5)).await;
    coordinator.start("second", second.clone());
    coordinator.wait().await;

    assert!(!first.calls().contains(&Call::Done));
    assert_eq!(second.calls().last(), Some(&Call::Done));
    assert_eq!(
        second.calls()[second.calls().len() - 2],
        Call::Update("Hello".to_string())
    );

    // Only the completed turn remains in history
    let session = coordinator.session();
    let session = session.lock().await;
    assert_eq!(
        session.history(),
        &[Message::user("second"), Message::assistant("Hello")]
    );
}

#[tokio::test]
async fn test_coordinator_from_app_state() {
    let temp_dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(temp_dir.path()).unwrap();
    fs::write(
        user_config_path(temp_dir.path()),
        "[[providers]]\nname = \"openai\"\napi_key = \"sk-config\"\n",
    )
    .unwrap();

    let transport = ScriptedTransport::new(hello_body());
    let state = AppState::load_from_dir(temp_dir.path(), transport.clone()).unwrap();
    let mut coordinator = state.coordinator(None, Handle::current()).unwrap();
    let recorder = Recorder::new();

    coordinator.start("hi", recorder.clone());
    coordinator.wait().await;

    assert_eq!(recorder.calls().last(), Some(&Call::Done));
    assert_eq!(transport.request_count(), 1);
    let request = transport.requests.lock().unwrap()[0].clone();
    assert_eq!(request.api_key, "sk-config");
    assert_eq!(request.model, "gpt-3.5-turbo");
}
