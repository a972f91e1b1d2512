//! Prompts declared by a generator, and the answers they resolve to.
//!
//! The pipeline never asks anything itself: an interactive layer turns the
//! prompts into [`Answers`], and only the answers flow downstream.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ── Prompt ───────────────────────────────────────────────────────────────────

/// One question a generator asks before rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Prompt {
    Text(TextPrompt),
    Confirm(ConfirmPrompt),
    Select(SelectPrompt),
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TextPrompt {
    pub name: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_value: Option<String>,
    /// Reject empty input.
    #[serde(default)]
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConfirmPrompt {
    pub name: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inactive_label: Option<String>,
    #[serde(default)]
    pub initial_value: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectPrompt {
    pub name: String,
    pub message: String,
    pub options: Vec<SelectOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_items: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(default)]
    pub disabled: bool,
}

impl SelectOption {
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.value)
    }
}

impl Prompt {
    pub fn name(&self) -> &str {
        match self {
            Self::Text(p) => &p.name,
            Self::Confirm(p) => &p.name,
            Self::Select(p) => &p.name,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Text(p) => &p.message,
            Self::Confirm(p) => &p.message,
            Self::Select(p) => &p.message,
        }
    }

    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Confirm(_) => "confirm",
            Self::Select(_) => "select",
        }
    }

    /// The answer used when nobody is around to ask.
    ///
    /// `None` means the prompt has no usable default (a required text prompt
    /// without default, or a select whose options are all disabled).
    pub fn default_answer(&self) -> Option<AnswerValue> {
        match self {
            Self::Text(p) => p
                .default_value
                .as_ref()
                .or(p.initial_value.as_ref())
                .cloned()
                .or_else(|| (!p.required).then(String::new))
                .map(AnswerValue::Text),
            Self::Confirm(p) => Some(AnswerValue::Flag(p.initial_value)),
            Self::Select(p) => p
                .initial_value
                .as_ref()
                .filter(|v| p.options.iter().any(|o| &o.value == *v && !o.disabled))
                .cloned()
                .or_else(|| {
                    p.options
                        .iter()
                        .find(|o| !o.disabled)
                        .map(|o| o.value.clone())
                })
                .map(AnswerValue::Text),
        }
    }
}

// ── Answers ──────────────────────────────────────────────────────────────────

/// A single resolved answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Flag(bool),
    Text(String),
}

impl AnswerValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Flag(_) => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(b) => Some(*b),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Flag(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for AnswerValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for AnswerValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<bool> for AnswerValue {
    fn from(b: bool) -> Self {
        Self::Flag(b)
    }
}

/// Resolved answers, keyed by prompt name.
///
/// Ordered so that fingerprints computed over answers are stable.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Answers(BTreeMap<String, AnswerValue>);

impl Answers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<AnswerValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<AnswerValue>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&AnswerValue> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &AnswerValue)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Fill every prompt that has no answer yet with its default.
    pub fn fill_defaults(&mut self, prompts: &[Prompt]) {
        for prompt in prompts {
            if self.contains(prompt.name()) {
                continue;
            }
            if let Some(value) = prompt.default_answer() {
                self.insert(prompt.name(), value);
            }
        }
    }

    /// Prompts that are still unanswered.
    pub fn missing<'a>(&self, prompts: &'a [Prompt]) -> Vec<&'a Prompt> {
        prompts.iter().filter(|p| !self.contains(p.name())).collect()
    }
}

impl FromIterator<(String, AnswerValue)> for Answers {
    fn from_iter<T: IntoIterator<Item = (String, AnswerValue)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
