//! Palette Controller
//!
//! Decides what the prompt palette shows for the current query: the recent
//! prompts when the query is blank, fuzzy matches otherwise. Tracks the
//! highlighted row and records the committed choice in the store's MRU.

use quickprompt_core::{CoreError, CoreResult};

use crate::services::prompts::fuzzy::FuzzyMatcher;
use crate::services::prompts::store::PromptStore;

/// One palette row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteItem {
    pub name: String,
    /// Match score; `None` for rows coming from the MRU list
    pub score: Option<u8>,
}

/// Palette state over a borrowed prompt store
pub struct PaletteController<'a> {
    store: &'a mut PromptStore,
    limit: usize,
    query: String,
    items: Vec<PaletteItem>,
    highlighted: usize,
}

impl<'a> PaletteController<'a> {
    /// Open the palette showing up to `limit` rows, starting with the MRU list
    pub fn open(store: &'a mut PromptStore, limit: usize) -> Self {
        let mut palette = Self {
            store,
            limit,
            query: String::new(),
            items: Vec::new(),
            highlighted: 0,
        };
        palette.refresh();
        palette
    }

    /// Replace the query and recompute the rows. The first row is highlighted.
    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
        self.refresh();
    }

    fn refresh(&mut self) {
        self.items = if self.query.trim().is_empty() {
            self.store
                .most_recent(Some(self.limit))
                .into_iter()
                .map(|name| PaletteItem { name, score: None })
                .collect()
        } else {
            FuzzyMatcher::rank(&self.query, self.store.names(), self.limit)
                .into_iter()
                .map(|(name, score)| PaletteItem {
                    name,
                    score: Some(score),
                })
                .collect()
        };
        self.highlighted = 0;
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn items(&self) -> &[PaletteItem] {
        &self.items
    }

    pub fn highlighted(&self) -> Option<&PaletteItem> {
        self.items.get(self.highlighted)
    }

    pub fn highlighted_index(&self) -> Option<usize> {
        (!self.items.is_empty()).then_some(self.highlighted)
    }

    /// Template body of the highlighted row
    pub fn preview(&self) -> Option<&str> {
        let item = self.highlighted()?;
        self.store.template_for(&item.name).ok()
    }

    pub fn move_up(&mut self) {
        self.highlighted = self.highlighted.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.highlighted + 1 < self.items.len() {
            self.highlighted += 1;
        }
    }

    /// Commit the highlighted row
    pub fn commit(&mut self) -> CoreResult<String> {
        let name = self
            .highlighted()
            .map(|item| item.name.clone())
            .ok_or_else(|| CoreError::not_found("no prompt highlighted"))?;
        self.commit_name(&name)
    }

    /// Commit a prompt by name, e.g. one typed out in full
    pub fn commit_name(&mut self, name: &str) -> CoreResult<String> {
        self.store.select_prompt(name)?;
        tracing::info!("[Palette] Committed '{}'", name);
        Ok(name.to_string())
    }

    pub fn store(&self) -> &PromptStore {
        self.store
    }
}
