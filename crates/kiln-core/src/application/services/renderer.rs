//! Artifact rendering: one action + answers → one artifact.
//!
//! Rendering never writes. It does read: templates from the templates
//! directory, and the current content of paths that `append`, `modify` and
//! `move` depend on. Those reads go through a per-run projection so an action
//! sees what earlier actions of the same run will have produced.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use crate::application::ApplicationError;
use crate::application::catalog::ResourceCatalog;
use crate::application::config::EngineConfig;
use crate::application::ports::{
    ArtifactCache, CachedRender, Filesystem, TemplateRenderer, read_existing,
};
use crate::domain::{
    Action, ActionKind, Answers, Artifact, BuiltinAction, Checksum, GeneratorResource,
    Provenance, TemplateKind,
};
use crate::error::{KilnError, KilnResult};

/// Answer bound to the current file content while rendering `modify` templates.
pub const CURRENT_CONTENT_ANSWER: &str = "content";

/// Everything an action renders against.
#[derive(Clone, Copy)]
pub struct RenderScope<'a> {
    pub generator: &'a GeneratorResource,
    pub answers: &'a Answers,
    pub config: &'a EngineConfig,
    pub catalog: &'a ResourceCatalog,
}

/// Renders a generator's actions into artifacts.
///
/// One instance per run: it owns the run's content projection.
pub struct ArtifactRenderer<'a> {
    renderer: &'a dyn TemplateRenderer,
    filesystem: &'a dyn Filesystem,
    cache: Option<&'a dyn ArtifactCache>,
    /// Path → content as the run has shaped it so far (`None` = absent).
    projected: HashMap<PathBuf, Option<String>>,
}

/// Template text plus the name used for it in error messages.
struct ResolvedTemplate {
    label: String,
    text: String,
    source_path: Option<PathBuf>,
}

impl<'a> ArtifactRenderer<'a> {
    pub fn new(renderer: &'a dyn TemplateRenderer, filesystem: &'a dyn Filesystem) -> Self {
        Self {
            renderer,
            filesystem,
            cache: None,
            projected: HashMap::new(),
        }
    }

    pub fn with_cache(mut self, cache: &'a dyn ArtifactCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Render every action of the generator, in order.
    #[instrument(skip_all, fields(generator = %scope.generator.name, actions = scope.generator.actions.len()))]
    pub fn render_all(&mut self, scope: RenderScope<'_>) -> KilnResult<Vec<Artifact>> {
        let artifacts = scope
            .generator
            .actions
            .iter()
            .enumerate()
            .map(|(index, action)| self.render(scope, index, action))
            .collect::<KilnResult<Vec<_>>>()?;

        info!(count = artifacts.len(), "Rendered artifacts");
        Ok(artifacts)
    }

    /// Render a single action.
    pub fn render(
        &mut self,
        scope: RenderScope<'_>,
        index: usize,
        action: &Action,
    ) -> KilnResult<Artifact> {
        let label = format!("{}#{}", scope.generator.name, index);
        let destination = self.expand(
            &action.destination,
            scope.answers,
            scope.catalog,
            &format!("{}:destination", label),
        )?;
        let destination = resolve(scope.config.paths.project.as_path(), &destination);

        let artifact = match &action.kind {
            ActionKind::Builtin(kind) => {
                self.render_builtin(scope, &label, *kind, action, destination)?
            }
            ActionKind::Custom(name) => self.render_custom(scope, name, action, destination)?,
        }
        .with_flags(action.flags());

        debug!(
            action = %action.kind,
            path = %artifact.destination_path().display(),
            checksum = %artifact.checksum().short(),
            "Rendered artifact"
        );
        self.projected.insert(
            artifact.destination_path().to_path_buf(),
            match artifact.action_type() {
                ActionKind::Builtin(BuiltinAction::Remove) => None,
                _ => Some(artifact.final_content().to_string()),
            },
        );
        Ok(artifact)
    }

    fn render_builtin(
        &mut self,
        scope: RenderScope<'_>,
        label: &str,
        kind: BuiltinAction,
        action: &Action,
        destination: PathBuf,
    ) -> KilnResult<Artifact> {
        let provenance = |source_path: Option<PathBuf>| Provenance {
            action_type: kind.into(),
            generator_name: scope.generator.name.to_string(),
            source_path,
            destination_path: destination.clone(),
        };

        match kind {
            BuiltinAction::Remove => Ok(Artifact::new("", "", provenance(None))),

            BuiltinAction::Move => {
                let source = self.expand(
                    &action.template.source_or_content,
                    scope.answers,
                    scope.catalog,
                    &format!("{}:source", label),
                )?;
                let source = resolve(scope.config.paths.project.as_path(), &source);
                let content = self.current(&source)?.ok_or_else(|| {
                    KilnError::from(ApplicationError::FilesystemError {
                        path: source.clone(),
                        reason: "move source does not exist".into(),
                    })
                })?;
                self.projected.insert(source.clone(), None);
                Ok(Artifact::new(content.clone(), content, provenance(Some(source))))
            }

            BuiltinAction::Copy => {
                let template = self.resolve_template(scope, label, action)?;
                Ok(Artifact::new(
                    template.text.clone(),
                    template.text,
                    provenance(template.source_path),
                ))
            }

            BuiltinAction::Add | BuiltinAction::Append | BuiltinAction::Modify => {
                let template = self.resolve_template(scope, label, action)?;
                let current = if kind.reads_destination() {
                    self.current(&destination)?
                } else {
                    None
                };

                let key = self.cache.map(|_| {
                    fingerprint(scope, kind, &destination, &template.text, current.as_deref())
                });
                if let Some(hit) = key.as_ref().and_then(|k| self.cache_get(k)) {
                    debug!(path = %destination.display(), "Render cache hit");
                    return Ok(Artifact::new(
                        hit.raw_content,
                        hit.final_content,
                        provenance(template.source_path),
                    ));
                }

                let (raw, full) = match kind {
                    BuiltinAction::Modify => {
                        let answers = scope.answers.clone().with(
                            CURRENT_CONTENT_ANSWER,
                            current.clone().unwrap_or_default(),
                        );
                        let out =
                            self.expand(&template.text, &answers, scope.catalog, &template.label)?;
                        (out.clone(), out)
                    }
                    BuiltinAction::Append => {
                        let piece = self.expand(
                            &template.text,
                            scope.answers,
                            scope.catalog,
                            &template.label,
                        )?;
                        let full = format!("{}{}", current.unwrap_or_default(), piece);
                        (piece, full)
                    }
                    _ => {
                        let out = self.expand(
                            &template.text,
                            scope.answers,
                            scope.catalog,
                            &template.label,
                        )?;
                        (out.clone(), out)
                    }
                };

                let artifact = Artifact::new(raw, full, provenance(template.source_path));
                if let Some(key) = key {
                    self.cache_put(&key, &artifact);
                }
                Ok(artifact)
            }
        }
    }

    fn render_custom(
        &mut self,
        scope: RenderScope<'_>,
        name: &str,
        action: &Action,
        destination: PathBuf,
    ) -> KilnResult<Artifact> {
        let custom = scope.catalog.custom_action(name).ok_or_else(|| {
            KilnError::from(ApplicationError::CustomActionNotFound { name: name.into() })
        })?;

        let output = custom
            .delegate
            .run(scope.answers, &action.config(), self.filesystem)
            .map_err(|e| ApplicationError::Delegate {
                action: name.into(),
                reason: e.to_string(),
            })?;

        Ok(Artifact::new(
            output.clone(),
            output,
            Provenance {
                action_type: action.kind.clone(),
                generator_name: scope.generator.name.to_string(),
                source_path: custom.source_path.clone(),
                destination_path: destination,
            },
        ))
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn expand(
        &self,
        template: &str,
        answers: &Answers,
        catalog: &ResourceCatalog,
        label: &str,
    ) -> KilnResult<String> {
        self.renderer
            .render(template, answers, catalog)
            .map_err(|e| {
                let reason = match e {
                    KilnError::Application(ApplicationError::Render { reason, .. }) => reason,
                    other => other.to_string(),
                };
                ApplicationError::Render {
                    template: label.to_string(),
                    reason,
                }
                .into()
            })
    }

    /// Text of the action's template: inline, from the catalog, or from disk.
    fn resolve_template(
        &self,
        scope: RenderScope<'_>,
        label: &str,
        action: &Action,
    ) -> KilnResult<ResolvedTemplate> {
        match action.template.kind {
            TemplateKind::Raw => Ok(ResolvedTemplate {
                label: format!("{}:raw", label),
                text: action.template.source_or_content.clone(),
                source_path: None,
            }),
            TemplateKind::File => {
                let reference = self.expand(
                    &action.template.source_or_content,
                    scope.answers,
                    scope.catalog,
                    &format!("{}:template", label),
                )?;

                if let Some(found) = scope.catalog.find_template(&reference) {
                    return Ok(ResolvedTemplate {
                        label: found.source_path.relative.display().to_string(),
                        text: found.raw_content.clone(),
                        source_path: Some(found.source_path.absolute.clone()),
                    });
                }

                let path = resolve(scope.config.paths.templates.as_path(), &reference);
                if !self.filesystem.is_file_exists(&path) {
                    return Err(ApplicationError::TemplateNotFound {
                        template: reference,
                    }
                    .into());
                }
                Ok(ResolvedTemplate {
                    label: path.display().to_string(),
                    text: self.filesystem.read_file(&path)?,
                    source_path: Some(path),
                })
            }
        }
    }

    /// Content of `path` as of this point in the run.
    fn current(&mut self, path: &Path) -> KilnResult<Option<String>> {
        if let Some(known) = self.projected.get(path) {
            return Ok(known.clone());
        }
        let content = read_existing(self.filesystem, path)?;
        self.projected.insert(path.to_path_buf(), content.clone());
        Ok(content)
    }

    fn cache_get(&self, fingerprint: &Checksum) -> Option<CachedRender> {
        let cache = self.cache?;
        match cache.get(fingerprint) {
            Ok(Some(entry)) if entry.is_intact() => Some(entry),
            Ok(Some(_)) => {
                warn!(fingerprint = %fingerprint.short(), "Cached render failed its checksum, re-rendering");
                None
            }
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "Render cache lookup failed");
                None
            }
        }
    }

    fn cache_put(&self, fingerprint: &Checksum, artifact: &Artifact) {
        let Some(cache) = self.cache else { return };
        let entry = CachedRender {
            raw_content: artifact.raw_content().to_string(),
            final_content: artifact.final_content().to_string(),
            checksum: artifact.checksum().clone(),
        };
        if let Err(e) = cache.put(fingerprint, entry) {
            warn!(error = %e, "Render cache store failed");
        }
    }
}

/// Join relative paths onto `base`.
fn resolve(base: &Path, path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Checksum of everything that determines a render's output.
///
/// Partials and catalog templates count with their bodies. Helpers are
/// closures and count by name only, so a host that changes what a helper
/// does must also rename it or clear the cache.
fn fingerprint(
    scope: RenderScope<'_>,
    kind: BuiltinAction,
    destination: &Path,
    template: &str,
    current: Option<&str>,
) -> Checksum {
    let mut parts: Vec<String> = vec![
        scope.generator.name.to_string(),
        kind.as_str().to_string(),
        destination.display().to_string(),
        template.to_string(),
        current.map_or_else(|| "\0absent".to_string(), str::to_string),
    ];
    parts.extend(scope.answers.iter().map(|(k, v)| format!("{}={}", k, v)));
    parts.extend(scope.catalog.helper_names().map(|h| format!("helper:{}", h)));
    for (name, body) in scope.catalog.partials() {
        parts.push(format!("partial:{}", name));
        parts.push(body.to_string());
    }
    for t in scope.catalog.templates() {
        parts.push(format!("template:{}", t.source_path.relative.display()));
        parts.push(t.raw_content.clone());
    }
    Checksum::of_parts(parts)
}
