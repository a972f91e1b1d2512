//! Hook pipeline: nine interception points around the run.
//!
//! Each point holds an ordered list of closures. Invocation is sequential in
//! registration order; a transforming hook's return value is what the next
//! hook (and then the pipeline) sees. Observers get read access only. Any
//! hook error ends the run with [`ApplicationError::Hook`], carrying the
//! hook's message verbatim; later hooks at that point do not run.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use tracing::debug;

use crate::application::ApplicationError;
use crate::application::catalog::ResourceCatalog;
use crate::application::config::{Behavior, EngineConfig, Strategy};
use crate::domain::{Answers, ApplyResult, Artifact, Plan, Report, RuntimeId};
use crate::error::KilnResult;

/// What a hook returns; the error string becomes the run's failure reason.
pub type HookResult<T> = Result<T, String>;

type Observer = Box<dyn Fn(&HookContext) -> HookResult<()> + Send + Sync>;
type Transform<T> = Box<dyn Fn(&HookContext, T) -> HookResult<T> + Send + Sync>;
type Inspector<T> = Box<dyn Fn(&HookContext, &[T]) -> HookResult<()> + Send + Sync>;

// ── Points ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum HookPoint {
    Initialized,
    ContextCreated,
    ConfigLoaded,
    ResourceLoaded,
    Rendered,
    Planned,
    Applied,
    Finalized,
    Reported,
}

impl HookPoint {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Initialized => "onInitialized",
            Self::ContextCreated => "onContextCreated",
            Self::ConfigLoaded => "onConfigLoaded",
            Self::ResourceLoaded => "onResourceLoaded",
            Self::Rendered => "onRendered",
            Self::Planned => "onPlanned",
            Self::Applied => "onApplied",
            Self::Finalized => "onFinalized",
            Self::Reported => "onReported",
        }
    }
}

impl fmt::Display for HookPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Contexts ─────────────────────────────────────────────────────────────────

/// Read-only facts every hook receives.
///
/// `behavior` and `strategy` are filled in once configuration is loaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HookContext {
    pub runtime_id: RuntimeId,
    pub command: String,
    pub generator_name: Option<String>,
    pub behavior: Option<Behavior>,
    pub strategy: Option<Strategy>,
}

impl HookContext {
    pub fn new(runtime_id: RuntimeId, command: impl Into<String>) -> Self {
        Self {
            runtime_id,
            command: command.into(),
            generator_name: None,
            behavior: None,
            strategy: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuntimeInfo {
    pub id: RuntimeId,
    pub command: String,
    pub timestamp: DateTime<Utc>,
    pub args: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Environment {
    pub cwd: PathBuf,
}

/// The per-run state handed to `onContextCreated`.
///
/// Hooks may rewrite the answers or the generator name; the pipeline uses
/// whatever they return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunContext {
    pub runtime: RuntimeInfo,
    pub env: Environment,
    pub generator_name: String,
    pub answers: Answers,
}

// ── Registry ─────────────────────────────────────────────────────────────────

/// Registered hooks, one ordered list per point.
#[derive(Default)]
pub struct HookRegistry {
    initialized: Vec<Observer>,
    context_created: Vec<Transform<RunContext>>,
    config_loaded: Vec<Transform<EngineConfig>>,
    resource_loaded: Vec<Transform<ResourceCatalog>>,
    rendered: Vec<Transform<Vec<Artifact>>>,
    planned: Vec<Transform<Vec<Plan>>>,
    applied: Vec<Inspector<ApplyResult>>,
    finalized: Vec<Observer>,
    reported: Vec<Inspector<Report>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_initialized<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&HookContext) -> HookResult<()> + Send + Sync + 'static,
    {
        self.initialized.push(Box::new(hook));
        self
    }

    pub fn on_context_created<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&HookContext, RunContext) -> HookResult<RunContext> + Send + Sync + 'static,
    {
        self.context_created.push(Box::new(hook));
        self
    }

    pub fn on_config_loaded<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&HookContext, EngineConfig) -> HookResult<EngineConfig> + Send + Sync + 'static,
    {
        self.config_loaded.push(Box::new(hook));
        self
    }

    pub fn on_resource_loaded<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&HookContext, ResourceCatalog) -> HookResult<ResourceCatalog>
            + Send
            + Sync
            + 'static,
    {
        self.resource_loaded.push(Box::new(hook));
        self
    }

    pub fn on_rendered<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&HookContext, Vec<Artifact>) -> HookResult<Vec<Artifact>> + Send + Sync + 'static,
    {
        self.rendered.push(Box::new(hook));
        self
    }

    pub fn on_planned<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&HookContext, Vec<Plan>) -> HookResult<Vec<Plan>> + Send + Sync + 'static,
    {
        self.planned.push(Box::new(hook));
        self
    }

    pub fn on_applied<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&HookContext, &[ApplyResult]) -> HookResult<()> + Send + Sync + 'static,
    {
        self.applied.push(Box::new(hook));
        self
    }

    pub fn on_finalized<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&HookContext) -> HookResult<()> + Send + Sync + 'static,
    {
        self.finalized.push(Box::new(hook));
        self
    }

    pub fn on_reported<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&HookContext, &[Report]) -> HookResult<()> + Send + Sync + 'static,
    {
        self.reported.push(Box::new(hook));
        self
    }

    /// Number of hooks registered at `point`.
    pub fn len(&self, point: HookPoint) -> usize {
        match point {
            HookPoint::Initialized => self.initialized.len(),
            HookPoint::ContextCreated => self.context_created.len(),
            HookPoint::ConfigLoaded => self.config_loaded.len(),
            HookPoint::ResourceLoaded => self.resource_loaded.len(),
            HookPoint::Rendered => self.rendered.len(),
            HookPoint::Planned => self.planned.len(),
            HookPoint::Applied => self.applied.len(),
            HookPoint::Finalized => self.finalized.len(),
            HookPoint::Reported => self.reported.len(),
        }
    }

    // -------------------------------------------------------------------------
    // Invocation
    // -------------------------------------------------------------------------

    pub fn initialized(&self, ctx: &HookContext) -> KilnResult<()> {
        observe(HookPoint::Initialized, &self.initialized, ctx)
    }

    pub fn context_created(&self, ctx: &HookContext, value: RunContext) -> KilnResult<RunContext> {
        transform(HookPoint::ContextCreated, &self.context_created, ctx, value)
    }

    pub fn config_loaded(&self, ctx: &HookContext, value: EngineConfig) -> KilnResult<EngineConfig> {
        transform(HookPoint::ConfigLoaded, &self.config_loaded, ctx, value)
    }

    pub fn resource_loaded(
        &self,
        ctx: &HookContext,
        value: ResourceCatalog,
    ) -> KilnResult<ResourceCatalog> {
        transform(HookPoint::ResourceLoaded, &self.resource_loaded, ctx, value)
    }

    pub fn rendered(&self, ctx: &HookContext, value: Vec<Artifact>) -> KilnResult<Vec<Artifact>> {
        transform(HookPoint::Rendered, &self.rendered, ctx, value)
    }

    pub fn planned(&self, ctx: &HookContext, value: Vec<Plan>) -> KilnResult<Vec<Plan>> {
        transform(HookPoint::Planned, &self.planned, ctx, value)
    }

    pub fn applied(&self, ctx: &HookContext, results: &[ApplyResult]) -> KilnResult<()> {
        inspect(HookPoint::Applied, &self.applied, ctx, results)
    }

    pub fn finalized(&self, ctx: &HookContext) -> KilnResult<()> {
        observe(HookPoint::Finalized, &self.finalized, ctx)
    }

    pub fn reported(&self, ctx: &HookContext, reports: &[Report]) -> KilnResult<()> {
        inspect(HookPoint::Reported, &self.reported, ctx, reports)
    }
}

fn hook_error(point: HookPoint, reason: String) -> crate::error::KilnError {
    ApplicationError::Hook { point, reason }.into()
}

fn observe(point: HookPoint, hooks: &[Observer], ctx: &HookContext) -> KilnResult<()> {
    for (index, hook) in hooks.iter().enumerate() {
        debug!(%point, index, "running hook");
        hook(ctx).map_err(|reason| hook_error(point, reason))?;
    }
    Ok(())
}

fn transform<T>(point: HookPoint, hooks: &[Transform<T>], ctx: &HookContext, value: T) -> KilnResult<T> {
    hooks.iter().enumerate().try_fold(value, |value, (index, hook)| {
        debug!(%point, index, "running hook");
        hook(ctx, value).map_err(|reason| hook_error(point, reason))
    })
}

fn inspect<T>(point: HookPoint, hooks: &[Inspector<T>], ctx: &HookContext, items: &[T]) -> KilnResult<()> {
    for (index, hook) in hooks.iter().enumerate() {
        debug!(%point, index, "running hook");
        hook(ctx, items).map_err(|reason| hook_error(point, reason))?;
    }
    Ok(())
}
