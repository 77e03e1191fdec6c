//! Settings and Reload Integration Tests
//!
//! Request timeout bounds from settings.json through to chat sessions,
//! configuration reload, and failure reporting when a stream task dies.

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use quickprompt::models::settings::MAX_REQUEST_TIMEOUT_SECS;
use quickprompt::services::streaming::{StreamCoordinator, StreamState};
use quickprompt::storage::SettingsStore;
use quickprompt::utils::paths::{settings_path, user_config_path};
use quickprompt::{AppError, AppResult, AppState, SettingsUpdate};
use quickprompt_llm::{ChatSession, HttpTransport, LlmError, ProviderProfile};
use tokio::runtime::Handle;

use crate::support::{Call, PanickingTransport, Recorder};

const OPENAI_KEY: &str = "[[providers]]\nname = \"openai\"\napi_key = \"sk-config\"\n";

fn load(dir: &std::path::Path) -> AppResult<AppState> {
    let transport = Arc::new(HttpTransport::with_defaults().unwrap());
    AppState::load_from_dir(dir, transport)
}

#[test]
fn test_oversized_timeout_in_settings_file_is_rejected() {
    let temp_dir = tempfile::tempdir().unwrap();
    fs::write(
        settings_path(temp_dir.path()),
        format!(r#"{{"quickprompt":{{"requestTimeoutSecs":{}}}}}"#, u64::MAX),
    )
    .unwrap();

    let err = load(temp_dir.path()).err().unwrap();
    assert!(matches!(err, AppError::Validation(_)));
    assert!(err.is_config());
}

#[test]
fn test_timeout_setting_reaches_sessions() {
    let temp_dir = tempfile::tempdir().unwrap();
    fs::write(user_config_path(temp_dir.path()), OPENAI_KEY).unwrap();
    let mut state = load(temp_dir.path()).unwrap();

    let default_session = state.open_session(None).unwrap();
    assert_eq!(default_session.request_timeout(), Some(Duration::from_secs(120)));

    state
        .update_settings(SettingsUpdate {
            request_timeout_secs: Some(MAX_REQUEST_TIMEOUT_SECS),
            ..Default::default()
        })
        .unwrap();
    let session = state.open_session(None).unwrap();
    assert_eq!(
        session.request_timeout(),
        Some(Duration::from_secs(MAX_REQUEST_TIMEOUT_SECS))
    );

    let err = state
        .update_settings(SettingsUpdate {
            request_timeout_secs: Some(MAX_REQUEST_TIMEOUT_SECS + 1),
            ..Default::default()
        })
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(state.settings().request_timeout_secs, MAX_REQUEST_TIMEOUT_SECS);
}

#[test]
fn test_reload_rebuilds_store_and_keeps_mru() {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut state = load(temp_dir.path()).unwrap();
    assert_eq!(state.prompts().len(), 3);
    state.select_prompt("translate").unwrap();

    fs::write(
        user_config_path(temp_dir.path()),
        format!(
            "{}\n[[prompts]]\nname = \"haiku\"\ntemplate = \"Write a haiku about {{clipboard}}\"\n",
            OPENAI_KEY
        ),
    )
    .unwrap();
    state.reload_config().unwrap();

    assert_eq!(state.prompts().len(), 4);
    assert!(state.prompts().contains("haiku"));
    assert_eq!(state.prompts().most_recent(Some(1)), vec!["translate"]);
    assert!(state.open_session(None).is_ok());

    let settings = SettingsStore::open(settings_path(temp_dir.path()), "quickprompt").unwrap();
    assert_eq!(settings.get().mru_commands, vec!["translate"]);
}

#[test]
fn test_reload_with_broken_config_keeps_previous_state() {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut state = load(temp_dir.path()).unwrap();

    fs::write(user_config_path(temp_dir.path()), "[[prompts]\nname = ").unwrap();
    let err = state.reload_config().unwrap_err();
    assert!(err.is_config());
    assert_eq!(state.prompts().len(), 3);
}

#[tokio::test]
async fn test_dead_stream_task_still_reports_failure() {
    let session = ChatSession::new(
        ProviderProfile::openai(),
        "sk-test",
        Arc::new(PanickingTransport),
    );
    let mut coordinator = StreamCoordinator::new(session, Handle::current());
    let recorder = Recorder::new();

    coordinator.start("hi", recorder.clone());
    coordinator.wait().await;

    let calls = recorder.calls();
    assert_eq!(calls.first(), Some(&Call::Update(String::new())));
    assert!(matches!(calls.last(), Some(Call::Error(LlmError::Other { .. }))));
    assert!(matches!(coordinator.state(), Some(StreamState::Failed(_))));
    assert!(coordinator.session().lock().await.history().is_empty());
}
