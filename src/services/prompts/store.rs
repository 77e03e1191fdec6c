//! Prompt Store
//!
//! Named templates plus the most-recently-used ordering shown by the palette.
//! The store is loaded from configuration and settings at startup; only
//! `select_prompt` changes it afterwards.

use std::collections::HashMap;

use quickprompt_core::{CoreError, CoreResult};

use crate::models::prompt::{PlaceholderContext, PromptTemplate};
use crate::services::prompts::template::ParsedTemplate;

#[derive(Debug, Clone)]
struct StoredPrompt {
    body: String,
    parsed: ParsedTemplate,
}

/// Prompt templates and MRU tracking
#[derive(Debug, Clone)]
pub struct PromptStore {
    prompts: HashMap<String, StoredPrompt>,
    /// All names in sorted order; used to fill short MRU lists
    sorted_names: Vec<String>,
    /// Most recent first; may name prompts that no longer exist
    mru: Vec<String>,
    limit: usize,
}

impl PromptStore {
    /// Build a store from configured templates and the persisted MRU list.
    pub fn load(templates: Vec<PromptTemplate>, mru: Vec<String>, limit: usize) -> CoreResult<Self> {
        if limit == 0 {
            return Err(CoreError::config("MRU limit must be at least 1"));
        }
        if templates.is_empty() {
            return Err(CoreError::config("no prompt templates configured"));
        }

        let mut prompts = HashMap::with_capacity(templates.len());
        for template in templates {
            if prompts.contains_key(&template.name) {
                return Err(CoreError::config(format!(
                    "duplicate prompt name '{}'",
                    template.name
                )));
            }
            let parsed = ParsedTemplate::parse(&template.name, &template.template)
                .map_err(|e| CoreError::config(e.to_string()))?;
            prompts.insert(
                template.name,
                StoredPrompt {
                    body: template.template,
                    parsed,
                },
            );
        }

        let mut sorted_names: Vec<String> = prompts.keys().cloned().collect();
        sorted_names.sort();

        let mut deduped: Vec<String> = Vec::with_capacity(mru.len().min(limit));
        for name in mru {
            if !deduped.contains(&name) {
                deduped.push(name);
            }
        }
        deduped.truncate(limit);

        tracing::debug!(
            "[PromptStore] Loaded {} prompts, {} MRU entries (limit {})",
            sorted_names.len(),
            deduped.len(),
            limit
        );

        Ok(Self {
            prompts,
            sorted_names,
            mru: deduped,
            limit,
        })
    }

    /// Template body for `name`
    pub fn template_for(&self, name: &str) -> CoreResult<&str> {
        self.prompts
            .get(name)
            .map(|p| p.body.as_str())
            .ok_or_else(|| CoreError::not_found(format!("prompt '{}'", name)))
    }

    /// Up to `count` names (default: the MRU limit): the persisted MRU list
    /// without unknown names, topped up from the sorted name list.
    pub fn most_recent(&self, count: Option<usize>) -> Vec<String> {
        let count = count.unwrap_or(self.limit);
        let mut names: Vec<String> = self
            .mru
            .iter()
            .filter(|name| self.prompts.contains_key(name.as_str()))
            .take(count)
            .cloned()
            .collect();

        for name in &self.sorted_names {
            if names.len() >= count {
                break;
            }
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
        names
    }

    /// Record `name` as the most recent selection.
    pub fn select_prompt(&mut self, name: &str) -> CoreResult<()> {
        if !self.prompts.contains_key(name) {
            return Err(CoreError::not_found(format!("prompt '{}'", name)));
        }
        self.mru.retain(|existing| existing != name);
        self.mru.insert(0, name.to_string());
        self.mru.truncate(self.limit);
        tracing::debug!("[PromptStore] Selected '{}'", name);
        Ok(())
    }

    /// Render the template `name` with `context`.
    pub fn render(&self, name: &str, context: &PlaceholderContext) -> CoreResult<String> {
        self.prompts
            .get(name)
            .ok_or_else(|| CoreError::not_found(format!("prompt '{}'", name)))?
            .parsed
            .render(context)
    }

    /// Placeholder names used by the template `name`
    pub fn placeholders(&self, name: &str) -> CoreResult<Vec<&str>> {
        self.prompts
            .get(name)
            .map(|p| p.parsed.placeholders())
            .ok_or_else(|| CoreError::not_found(format!("prompt '{}'", name)))
    }

    /// All prompt names, sorted
    pub fn names(&self) -> &[String] {
        &self.sorted_names
    }

    /// Raw MRU list for persistence
    pub fn mru(&self) -> &[String] {
        &self.mru
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn len(&self) -> usize {
        self.prompts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.prompts.contains_key(name)
    }
}
