//! Generators and their actions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::artifact::ActionFlags;
use super::common::GeneratorName;
use super::prompt::Prompt;
use crate::domain::value_objects::{ActionKind, BuiltinAction, Origin, TemplateKind};

// ── Action ───────────────────────────────────────────────────────────────────

/// The template an action renders: inline text or a reference to a file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActionTemplate {
    #[serde(default)]
    pub kind: TemplateKind,
    #[serde(default)]
    pub source_or_content: String,
}

impl ActionTemplate {
    pub fn raw(content: impl Into<String>) -> Self {
        Self {
            kind: TemplateKind::Raw,
            source_or_content: content.into(),
        }
    }

    pub fn file(source: impl Into<String>) -> Self {
        Self {
            kind: TemplateKind::File,
            source_or_content: source.into(),
        }
    }
}

/// One step of a generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "type")]
    pub kind: ActionKind,
    /// Destination path; itself a template.
    pub destination: String,
    #[serde(default)]
    pub template: ActionTemplate,
    #[serde(default)]
    pub abort_on_fail: bool,
    #[serde(default)]
    pub force_overwrite: bool,
}

impl Action {
    pub fn new(kind: impl Into<ActionKind>, destination: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            destination: destination.into(),
            template: ActionTemplate::default(),
            abort_on_fail: false,
            force_overwrite: false,
        }
    }

    pub fn add(destination: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(BuiltinAction::Add, destination).with_template(ActionTemplate::raw(content))
    }

    pub fn with_template(mut self, template: ActionTemplate) -> Self {
        self.template = template;
        self
    }

    pub fn abort_on_fail(mut self, value: bool) -> Self {
        self.abort_on_fail = value;
        self
    }

    pub fn force_overwrite(mut self, value: bool) -> Self {
        self.force_overwrite = value;
        self
    }

    pub fn flags(&self) -> ActionFlags {
        ActionFlags {
            abort_on_fail: self.abort_on_fail,
            force_overwrite: self.force_overwrite,
        }
    }

    /// The action as a custom delegate sees it: everything but its type.
    pub fn config(&self) -> ActionConfig {
        ActionConfig {
            destination: self.destination.clone(),
            template: self.template.clone(),
            abort_on_fail: self.abort_on_fail,
            force_overwrite: self.force_overwrite,
        }
    }
}

/// An action without its `type`, handed to custom action delegates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionConfig {
    pub destination: String,
    pub template: ActionTemplate,
    pub abort_on_fail: bool,
    pub force_overwrite: bool,
}

// ── Generator ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GeneratorMeta {
    #[serde(default)]
    pub origin: Origin,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_path: Option<PathBuf>,
}

/// A named recipe: prompts to ask, then actions to run in order.
///
/// Immutable once loaded into a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorResource {
    pub name: GeneratorName,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub prompts: Vec<Prompt>,
    pub actions: Vec<Action>,
    #[serde(default)]
    pub meta: GeneratorMeta,
}

impl GeneratorResource {
    pub fn new(name: GeneratorName) -> Self {
        Self {
            name,
            description: String::new(),
            prompts: Vec::new(),
            actions: Vec::new(),
            meta: GeneratorMeta::default(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_prompt(mut self, prompt: Prompt) -> Self {
        self.prompts.push(prompt);
        self
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    /// Names of the custom action types this generator relies on.
    pub fn custom_action_names(&self) -> impl Iterator<Item = &str> {
        self.actions.iter().filter_map(|a| match &a.kind {
            ActionKind::Custom(name) => Some(name.as_str()),
            ActionKind::Builtin(_) => None,
        })
    }
}
