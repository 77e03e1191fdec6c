//! Palette Integration Tests
//!
//! The palette flow against a full `AppState` in a temporary config
//! directory, including MRU persistence across restarts.

use std::fs;
use std::sync::Arc;

use quickprompt::storage::SettingsStore;
use quickprompt::utils::paths::{settings_path, user_config_path};
use quickprompt::{AppError, AppState, SettingsUpdate};
use quickprompt_llm::HttpTransport;

fn load(dir: &std::path::Path) -> AppState {
    let transport = Arc::new(HttpTransport::with_defaults().unwrap());
    AppState::load_from_dir(dir, transport).unwrap()
}

#[test]
fn test_fresh_state_lists_sorted_prompts() {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut state = load(temp_dir.path());

    let palette = state.palette();
    let names: Vec<&str> = palette.items().iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["define", "fun fact", "translate"]);
    assert!(palette.preview().unwrap().contains("{clipboard}"));
}

#[test]
fn test_commit_is_persisted_across_restart() {
    let temp_dir = tempfile::tempdir().unwrap();
    {
        let mut state = load(temp_dir.path());
        let committed = {
            let mut palette = state.palette();
            palette.set_query("trans");
            palette.commit().unwrap()
        };
        assert_eq!(committed, "translate");
        state.persist_mru().unwrap();
    }

    let settings = SettingsStore::open(settings_path(temp_dir.path()), "quickprompt").unwrap();
    assert_eq!(settings.get().mru_commands, vec!["translate"]);

    let mut state = load(temp_dir.path());
    let palette = state.palette();
    assert_eq!(palette.highlighted().unwrap().name, "translate");
}

#[test]
fn test_render_prompt_uses_clipboard() {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut state = load(temp_dir.path());

    state.select_prompt("translate").unwrap();
    let text = state.render_prompt("translate", "bonjour le monde").unwrap();
    assert_eq!(text, "Translate the following passage to english:\nbonjour le monde");

    assert!(matches!(
        state.render_prompt("missing", ""),
        Err(AppError::Core(_))
    ));
}

#[test]
fn test_user_prompts_and_palette_rows() {
    let temp_dir = tempfile::tempdir().unwrap();
    fs::write(
        user_config_path(temp_dir.path()),
        r#"
[[prompts]]
name = "haiku"
template = "Write a haiku about {clipboard}"

[[prompts]]
name = "critique"
template = "Critique this: {clipboard}"
"#,
    )
    .unwrap();

    let mut state = load(temp_dir.path());
    assert_eq!(state.prompts().len(), 5);

    state
        .update_settings(SettingsUpdate {
            palette_rows: Some(2),
            ..Default::default()
        })
        .unwrap();
    let palette = state.palette();
    let names: Vec<&str> = palette.items().iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["critique", "define"]);
}

#[test]
fn test_missing_key_is_config_error() {
    let temp_dir = tempfile::tempdir().unwrap();
    let state = load(temp_dir.path());
    let err = state.open_session(None).unwrap_err();
    assert!(err.is_config());
}
