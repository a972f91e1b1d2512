//! The resource catalog: everything a run may reference, keyed by name.
//!
//! Built once by a loader (or programmatically), then read-only for the
//! rest of the pipeline. `onResourceLoaded` hooks receive it by value and may
//! hand back a modified copy.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;

use crate::application::ports::{ActionDelegate, BoxError, Filesystem};
use crate::domain::{
    ActionConfig, ActionKind, Answers, DomainError, DomainValidator, GeneratorResource, Origin,
};

/// A template-expression helper: takes the rendered argument, returns text.
pub type HelperFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// A registered custom action type.
#[derive(Clone)]
pub struct CustomAction {
    pub name: String,
    pub delegate: Arc<dyn ActionDelegate>,
    pub origin: Origin,
    pub source_path: Option<PathBuf>,
}

impl fmt::Debug for CustomAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomAction")
            .field("name", &self.name)
            .field("origin", &self.origin)
            .field("source_path", &self.source_path)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateSourcePath {
    pub absolute: PathBuf,
    /// Relative to the templates directory; this is what actions reference.
    pub relative: PathBuf,
}

/// A raw template file known to the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateResource {
    /// File name without its final extension (`component.tsx.hbs` → `component.tsx`).
    pub name: String,
    /// Relative path with separators replaced by dots (`react.component.tsx.hbs`).
    pub dot_name: String,
    pub source_path: TemplateSourcePath,
    pub raw_content: String,
}

impl TemplateResource {
    pub fn new(relative: impl Into<PathBuf>, absolute: impl Into<PathBuf>, raw_content: impl Into<String>) -> Self {
        let relative = relative.into();
        let name = relative
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let dot_name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join(".");
        Self {
            name,
            dot_name,
            source_path: TemplateSourcePath {
                absolute: absolute.into(),
                relative,
            },
            raw_content: raw_content.into(),
        }
    }

    fn answers_to(&self, reference: &str) -> bool {
        let reference = reference.trim_start_matches("./");
        self.source_path.relative.as_os_str() == reference
            || self.dot_name == reference
            || self.name == reference
    }
}

#[derive(Clone, Default)]
pub struct ResourceCatalog {
    generators: BTreeMap<String, GeneratorResource>,
    custom_actions: BTreeMap<String, CustomAction>,
    helpers: BTreeMap<String, HelperFn>,
    partials: BTreeMap<String, String>,
    templates: Vec<TemplateResource>,
}

impl ResourceCatalog {
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    pub fn generator(&self, name: &str) -> Option<&GeneratorResource> {
        self.generators.get(name)
    }

    pub fn generators(&self) -> impl Iterator<Item = &GeneratorResource> {
        self.generators.values()
    }

    pub fn custom_action(&self, name: &str) -> Option<&CustomAction> {
        self.custom_actions.get(name)
    }

    pub fn custom_actions(&self) -> impl Iterator<Item = &CustomAction> {
        self.custom_actions.values()
    }

    pub fn helper(&self, name: &str) -> Option<&HelperFn> {
        self.helpers.get(name)
    }

    pub fn helper_names(&self) -> impl Iterator<Item = &str> {
        self.helpers.keys().map(String::as_str)
    }

    pub fn partial(&self, name: &str) -> Option<&str> {
        self.partials.get(name).map(String::as_str)
    }

    /// Every partial as `(name, body)`, ordered by name.
    pub fn partials(&self) -> impl Iterator<Item = (&str, &str)> {
        self.partials
            .iter()
            .map(|(name, body)| (name.as_str(), body.as_str()))
    }

    pub fn templates(&self) -> &[TemplateResource] {
        &self.templates
    }

    /// Find a template by relative path, dot name or name, in that order.
    pub fn find_template(&self, reference: &str) -> Option<&TemplateResource> {
        let reference = reference.trim_start_matches("./");
        self.templates
            .iter()
            .find(|t| t.source_path.relative.as_os_str() == reference)
            .or_else(|| self.templates.iter().find(|t| t.answers_to(reference)))
    }

    /// Replace (or add) a generator. For `onResourceLoaded` hooks.
    pub fn with_generator(mut self, generator: GeneratorResource) -> Self {
        self.generators
            .insert(generator.name.as_str().to_string(), generator);
        self
    }

    /// Replace (or add) a partial. For `onResourceLoaded` hooks.
    pub fn with_partial(mut self, name: impl Into<String>, body: impl Into<String>) -> Self {
        self.partials.insert(name.into(), body.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }
}

impl fmt::Debug for ResourceCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceCatalog")
            .field("generators", &self.generators.keys().collect::<Vec<_>>())
            .field("custom_actions", &self.custom_actions.keys().collect::<Vec<_>>())
            .field("helpers", &self.helpers.keys().collect::<Vec<_>>())
            .field("partials", &self.partials.keys().collect::<Vec<_>>())
            .field("templates", &self.templates.len())
            .finish()
    }
}

// ── Builder ──────────────────────────────────────────────────────────────────

/// Collects resources, then validates them all at once in [`CatalogBuilder::build`].
#[derive(Default)]
pub struct CatalogBuilder {
    generators: Vec<GeneratorResource>,
    custom_actions: Vec<CustomAction>,
    helpers: Vec<(String, HelperFn)>,
    partials: Vec<(String, String)>,
    templates: Vec<TemplateResource>,
}

impl CatalogBuilder {
    pub fn generator(mut self, generator: GeneratorResource) -> Self {
        self.generators.push(generator);
        self
    }

    pub fn custom_action(mut self, action: CustomAction) -> Self {
        self.custom_actions.push(action);
        self
    }

    /// Register a closure as an internal custom action.
    pub fn custom_action_fn<F>(self, name: impl Into<String>, delegate: F) -> Self
    where
        F: Fn(&Answers, &ActionConfig, &dyn Filesystem) -> Result<String, BoxError>
            + Send
            + Sync
            + 'static,
    {
        self.custom_action(CustomAction {
            name: name.into(),
            delegate: Arc::new(delegate),
            origin: Origin::Internal,
            source_path: None,
        })
    }

    pub fn helper<F>(mut self, name: impl Into<String>, helper: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.helpers.push((name.into(), Arc::new(helper)));
        self
    }

    pub fn partial(mut self, name: impl Into<String>, body: impl Into<String>) -> Self {
        self.partials.push((name.into(), body.into()));
        self
    }

    pub fn template(mut self, template: TemplateResource) -> Self {
        self.templates.push(template);
        self
    }

    pub fn build(self) -> Result<ResourceCatalog, DomainError> {
        let mut catalog = ResourceCatalog::default();

        for generator in self.generators {
            DomainValidator::validate_generator(&generator)?;
            let name = generator.name.as_str().to_string();
            if catalog.generators.contains_key(&name) {
                return Err(DomainError::DuplicateResource {
                    kind: "generator",
                    name,
                });
            }
            catalog.generators.insert(name, generator);
        }

        for action in self.custom_actions {
            if matches!(action.name.parse::<ActionKind>(), Ok(ActionKind::Builtin(_))) {
                return Err(DomainError::InvalidGenerator {
                    name: action.name,
                    reason: "custom actions cannot shadow built-in action types".into(),
                });
            }
            insert_unique(&mut catalog.custom_actions, "custom action", action.name.clone(), action)?;
        }

        for (name, helper) in self.helpers {
            insert_unique(&mut catalog.helpers, "helper", name, helper)?;
        }

        for (name, body) in self.partials {
            insert_unique(&mut catalog.partials, "partial", name, body)?;
        }

        for template in self.templates {
            if catalog
                .templates
                .iter()
                .any(|t| t.source_path.relative == template.source_path.relative)
            {
                return Err(DomainError::DuplicateResource {
                    kind: "template",
                    name: template.source_path.relative.display().to_string(),
                });
            }
            catalog.templates.push(template);
        }

        Ok(catalog)
    }
}

fn insert_unique<V>(
    map: &mut BTreeMap<String, V>,
    kind: &'static str,
    name: String,
    value: V,
) -> Result<(), DomainError> {
    if map.contains_key(&name) {
        return Err(DomainError::DuplicateResource { kind, name });
    }
    map.insert(name, value);
    Ok(())
}
