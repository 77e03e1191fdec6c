//! Prompt Models
//!
//! Prompt templates as they appear in configuration, and the per-render
//! placeholder values.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date layout used for the `{date}` placeholder, e.g. "October 19, 2026"
pub const DATE_FORMAT: &str = "%B %d, %Y";

/// A named reusable prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptTemplate {
    /// Unique key shown in the palette
    pub name: String,
    /// Body text with `{placeholder}` tokens
    pub template: String,
}

impl PromptTemplate {
    pub fn new(name: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            template: template.into(),
        }
    }
}

/// Placeholder name -> value, built fresh for every render
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceholderContext {
    values: HashMap<String, String>,
}

impl PlaceholderContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context with `clipboard` and today's `date`
    pub fn standard(clipboard: impl Into<String>) -> Self {
        Self::standard_on(clipboard, chrono::Local::now().date_naive())
    }

    /// Context with `clipboard` and the given `date`
    pub fn standard_on(clipboard: impl Into<String>, date: NaiveDate) -> Self {
        Self::new()
            .with("clipboard", clipboard)
            .with("date", date.format(DATE_FORMAT).to_string())
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}
