//! Prompt Store Integration Tests
//!
//! MRU behaviour across selections, fuzzy ranking over configured names and
//! rendering of the built-in templates.

use chrono::NaiveDate;
use quickprompt::services::prompts::{FuzzyMatcher, PromptStore};
use quickprompt::{PlaceholderContext, PromptTemplate, QuickPromptConfig};
use quickprompt_core::CoreError;

fn many_templates(count: usize) -> Vec<PromptTemplate> {
    (0..count)
        .map(|i| PromptTemplate::new(format!("prompt {:02}", i), format!("Body {} {{clipboard}}", i)))
        .collect()
}

// ============================================================================
// MRU Tests
// ============================================================================

#[test]
fn test_most_recent_has_no_duplicates_and_only_known_names() {
    let store = PromptStore::load(
        many_templates(5),
        vec![
            "prompt 03".to_string(),
            "deleted".to_string(),
            "prompt 03".to_string(),
            "prompt 01".to_string(),
        ],
        10,
    )
    .unwrap();

    for k in 0..8 {
        let recent = store.most_recent(Some(k));
        assert_eq!(recent.len(), k.min(5));
        let mut unique = recent.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), recent.len());
        assert!(recent.iter().all(|name| store.contains(name)));
    }
    assert_eq!(
        store.most_recent(Some(3)),
        vec!["prompt 03", "prompt 01", "prompt 00"]
    );
}

#[test]
fn test_select_then_most_recent_one() {
    let mut store = PromptStore::load(many_templates(5), vec![], 10).unwrap();
    for name in ["prompt 02", "prompt 04", "prompt 02", "prompt 00"] {
        store.select_prompt(name).unwrap();
        assert_eq!(store.most_recent(Some(1)), vec![name.to_string()]);
    }
}

#[test]
fn test_more_selections_than_limit_keeps_latest() {
    let limit = 4;
    let mut store = PromptStore::load(many_templates(10), vec![], limit).unwrap();
    let order = [9, 1, 8, 2, 7, 3, 6];
    for i in order {
        store.select_prompt(&format!("prompt {:02}", i)).unwrap();
    }

    let expected: Vec<String> = order
        .iter()
        .rev()
        .take(limit)
        .map(|i| format!("prompt {:02}", i))
        .collect();
    assert_eq!(store.most_recent(Some(limit)), expected);
    assert_eq!(store.mru().len(), limit);
}

// ============================================================================
// Rendering Tests
// ============================================================================

#[test]
fn test_render_define_with_clipboard() {
    let store = PromptStore::load(
        vec![PromptTemplate::new("define", "Explain: {clipboard}")],
        vec![],
        50,
    )
    .unwrap();

    let ctx = PlaceholderContext::new().with("clipboard", "bonjour");
    assert_eq!(store.render("define", &ctx).unwrap(), "Explain: bonjour");

    let err = store.render("define", &PlaceholderContext::new()).unwrap_err();
    assert!(matches!(err, CoreError::MissingPlaceholder { .. }));
}

#[test]
fn test_builtin_templates_render() {
    let config = QuickPromptConfig::defaults();
    let store = PromptStore::load(config.prompts, vec![], 50).unwrap();
    let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
    let ctx = PlaceholderContext::standard_on("le chat", date);

    let fun_fact = store.render("fun fact", &ctx).unwrap();
    assert!(fun_fact.starts_with("Today is October 19, 2026."));

    let translate = store.render("translate", &ctx).unwrap();
    assert!(translate.ends_with("le chat"));

    let define = store.render("define", &ctx).unwrap();
    assert!(define.contains("Passage:\nle chat"));
}

// ============================================================================
// Ranking Tests
// ============================================================================

#[test]
fn test_rank_respects_limit_and_order_over_store_names() {
    let mut templates = QuickPromptConfig::defaults().prompts;
    templates.push(PromptTemplate::new("summarize", "Summarize: {clipboard}"));
    templates.push(PromptTemplate::new("fix grammar", "Fix: {clipboard}"));
    let store = PromptStore::load(templates, vec![], 50).unwrap();

    for query in ["f", "fun", "trans", "sum", "grammar fix", "xyz"] {
        for limit in 1..4 {
            let ranked = FuzzyMatcher::rank(query, store.names(), limit);
            assert!(ranked.len() <= limit);
            assert!(ranked.windows(2).all(|w| w[0].1 >= w[1].1));
            assert!(ranked.iter().all(|(_, score)| *score <= 100));
        }
    }

    let ranked = FuzzyMatcher::rank("grammar fix", store.names(), 1);
    assert_eq!(ranked[0].0, "fix grammar");
}
