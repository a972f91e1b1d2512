//! Placeholder substitution renderer.
//!
//! Supported tags:
//!
//! | Tag | Expands to |
//! |-----|------------|
//! | `{{ name }}` | the answer `name` |
//! | `{{ helper name }}` | helper applied to the answer `name` |
//! | `{{> partial }}` | the catalog partial, itself rendered |
//!
//! Helpers are looked up in the catalog first, then among the built-in case
//! helpers. Unknown answers, helpers and partials are errors: a placeholder
//! never survives into the output.

use tracing::instrument;

use kiln_core::{
    application::{ApplicationError, ports::TemplateRenderer, ResourceCatalog},
    domain::Answers,
    error::KilnResult,
};

use super::case::apply_builtin;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Partials may include partials, up to this depth.
const MAX_PARTIAL_DEPTH: usize = 16;

/// Simple renderer using basic placeholder substitution.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleRenderer;

impl SimpleRenderer {
    /// Create a new simple renderer.
    pub fn new() -> Self {
        Self
    }

    fn render_at(
        &self,
        template: &str,
        answers: &Answers,
        catalog: &ResourceCatalog,
        depth: usize,
    ) -> Result<String, String> {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start) = rest.find(OPEN) {
            out.push_str(&rest[..start]);
            let after = &rest[start + OPEN.len()..];
            let end = after
                .find(CLOSE)
                .ok_or_else(|| format!("unclosed tag at byte {}", template.len() - rest.len() + start))?;

            let tag = after[..end].trim();
            out.push_str(&self.expand_tag(tag, answers, catalog, depth)?);
            rest = &after[end + CLOSE.len()..];
        }

        out.push_str(rest);
        Ok(out)
    }

    fn expand_tag(
        &self,
        tag: &str,
        answers: &Answers,
        catalog: &ResourceCatalog,
        depth: usize,
    ) -> Result<String, String> {
        if let Some(name) = tag.strip_prefix('>') {
            let name = name.trim();
            if depth >= MAX_PARTIAL_DEPTH {
                return Err(format!("partial '{name}' nested too deeply"));
            }
            let body = catalog
                .partial(name)
                .ok_or_else(|| format!("unknown partial '{name}'"))?;
            return self.render_at(body, answers, catalog, depth + 1);
        }

        let parts: Vec<&str> = tag.split_whitespace().collect();
        match parts.as_slice() {
            [name] => lookup(answers, name),
            [helper, name] => {
                let value = lookup(answers, name)?;
                if let Some(f) = catalog.helper(helper) {
                    return Ok(f(&value));
                }
                apply_builtin(helper, &value).ok_or_else(|| format!("unknown helper '{helper}'"))
            }
            [] => Err("empty tag".into()),
            _ => Err(format!("cannot parse tag '{tag}'")),
        }
    }
}

fn lookup(answers: &Answers, name: &str) -> Result<String, String> {
    answers
        .get(name)
        .map(ToString::to_string)
        .ok_or_else(|| format!("no answer for '{name}'"))
}

impl TemplateRenderer for SimpleRenderer {
    #[instrument(skip_all, fields(len = template.len()))]
    fn render(
        &self,
        template: &str,
        answers: &Answers,
        catalog: &ResourceCatalog,
    ) -> KilnResult<String> {
        self.render_at(template, answers, catalog, 0).map_err(|reason| {
            ApplicationError::Render {
                template: "<inline>".into(),
                reason,
            }
            .into()
        })
    }
}
