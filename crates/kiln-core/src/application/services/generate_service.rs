//! Generate Service - main application orchestrator.
//!
//! This service wires the pipeline stages and the hook points together in a
//! fixed order:
//! 1. `onInitialized`, then `onContextCreated` on the run context
//! 2. `onConfigLoaded`, `onResourceLoaded`, generator lookup
//! 3. Render → `onRendered`
//! 4. Plan → `onPlanned` → resolve pending conflicts → confirm
//! 5. Apply → `onApplied` → `onFinalized`
//! 6. Report → `onReported`

use std::path::PathBuf;

use chrono::Utc;
use tracing::{info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        catalog::ResourceCatalog,
        config::EngineConfig,
        ports::{ArtifactCache, DecisionProvider, Filesystem, TemplateRenderer},
        services::{
            executor::{CancellationToken, Executor},
            hooks::{Environment, HookContext, HookRegistry, RunContext, RuntimeInfo},
            planner::{PlanBuilder, resolve_pending},
            renderer::{ArtifactRenderer, RenderScope},
            reporter::Reporter,
        },
    },
    domain::{Answers, ApplyResult, Artifact, Plan, Report, RuntimeId},
    error::{KilnError, KilnResult},
};

/// One invocation of a generator.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub generator: String,
    pub answers: Answers,
    /// Name of the driving command, for hooks (`generate`).
    pub command: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl GenerateRequest {
    pub fn new(generator: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            generator: generator.into(),
            answers: Answers::new(),
            command: "generate".into(),
            args: Vec::new(),
            cwd: cwd.into(),
        }
    }

    pub fn with_answers(mut self, answers: Answers) -> Self {
        self.answers = answers;
        self
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }
}

/// Everything a run produced.
///
/// `halt` is set when the executor stopped before the last plan; the
/// results and reports up to that point are still here.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutput {
    pub runtime_id: RuntimeId,
    pub dry: bool,
    pub artifacts: Vec<Artifact>,
    pub plans: Vec<Plan>,
    pub results: Vec<ApplyResult>,
    pub reports: Vec<Report>,
    pub halt: Option<ApplicationError>,
}

impl RunOutput {
    pub fn is_complete(&self) -> bool {
        self.halt.is_none()
    }

    /// Turn a halted run into its error.
    pub fn into_result(self) -> KilnResult<Self> {
        match self.halt {
            Some(err) => Err(err.into()),
            None => Ok(self),
        }
    }
}

/// Main generation service.
pub struct GenerateService {
    config: EngineConfig,
    catalog: ResourceCatalog,
    renderer: Box<dyn TemplateRenderer>,
    filesystem: Box<dyn Filesystem>,
    decisions: Box<dyn DecisionProvider>,
    cache: Option<Box<dyn ArtifactCache>>,
    hooks: HookRegistry,
    cancellation: CancellationToken,
}

impl GenerateService {
    /// Create a new generate service with the given adapters.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use kiln_core::application::GenerateService;
    ///
    /// let service = GenerateService::new(
    ///     config,     // EngineConfig
    ///     catalog,    // ResourceCatalog
    ///     renderer,   // impl TemplateRenderer
    ///     filesystem, // impl Filesystem
    ///     decisions,  // impl DecisionProvider
    /// );
    /// ```
    pub fn new(
        config: EngineConfig,
        catalog: ResourceCatalog,
        renderer: Box<dyn TemplateRenderer>,
        filesystem: Box<dyn Filesystem>,
        decisions: Box<dyn DecisionProvider>,
    ) -> Self {
        Self {
            config,
            catalog,
            renderer,
            filesystem,
            decisions,
            cache: None,
            hooks: HookRegistry::new(),
            cancellation: CancellationToken::new(),
        }
    }

    pub fn with_cache(mut self, cache: Box<dyn ArtifactCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_hooks(mut self, hooks: HookRegistry) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn hooks_mut(&mut self) -> &mut HookRegistry {
        &mut self.hooks
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run a generator end to end.
    #[instrument(skip_all, fields(generator = %request.generator, command = %request.command))]
    pub fn run(&self, request: GenerateRequest) -> KilnResult<RunOutput> {
        let runtime_id = RuntimeId::generate();
        let mut ctx = HookContext::new(runtime_id.clone(), &request.command);
        ctx.generator_name = Some(request.generator.clone());

        self.hooks.initialized(&ctx)?;

        // 1. Run context
        let run = RunContext {
            runtime: RuntimeInfo {
                id: runtime_id.clone(),
                command: request.command,
                timestamp: Utc::now(),
                args: request.args,
            },
            env: Environment { cwd: request.cwd },
            generator_name: request.generator,
            answers: request.answers,
        };
        let run = self.hooks.context_created(&ctx, run)?;
        ctx.generator_name = Some(run.generator_name.clone());

        // 2. Configuration and resources
        let config = self.hooks.config_loaded(&ctx, self.config.clone())?;
        ctx.behavior = Some(config.behavior);
        ctx.strategy = Some(config.strategy);

        let catalog = self.hooks.resource_loaded(&ctx, self.catalog.clone())?;
        let generator = catalog.generator(&run.generator_name).ok_or_else(|| {
            KilnError::from(ApplicationError::GeneratorNotFound {
                name: run.generator_name.clone(),
            })
        })?;

        let mut answers = run.answers;
        answers.fill_defaults(&generator.prompts);
        let missing: Vec<_> = answers
            .missing(&generator.prompts)
            .iter()
            .map(|p| p.name().to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ApplicationError::ValidationFailed(format!(
                "no answer for required prompt(s): {}",
                missing.join(", ")
            ))
            .into());
        }

        info!(
            generator = %generator.name,
            actions = generator.actions.len(),
            dry = config.behavior.dry,
            "Generating"
        );

        // 3. Render
        let mut renderer =
            ArtifactRenderer::new(self.renderer.as_ref(), self.filesystem.as_ref());
        if config.caching() {
            if let Some(cache) = &self.cache {
                renderer = renderer.with_cache(cache.as_ref());
            }
        }
        let artifacts = renderer.render_all(RenderScope {
            generator,
            answers: &answers,
            config: &config,
            catalog: &catalog,
        })?;
        let artifacts = self.hooks.rendered(&ctx, artifacts)?;

        // 4. Plan
        let plans = PlanBuilder::new(self.filesystem.as_ref(), &config).build(artifacts.clone())?;
        let mut plans = self.hooks.planned(&ctx, plans)?;
        resolve_pending(&mut plans, self.decisions.as_ref())?;

        if config.behavior.confirm_before_run
            && !plans.is_empty()
            && !self.decisions.confirm_run(&plans)?
        {
            warn!("Run not confirmed");
            return Err(ApplicationError::Cancelled.into());
        }

        // 5. Apply
        let outcome = Executor::new(self.filesystem.as_ref(), &config)
            .with_cancellation(self.cancellation.clone())
            .apply(&plans);
        self.hooks.applied(&ctx, &outcome.results)?;
        self.hooks.finalized(&ctx)?;

        // 6. Report
        let reports = Reporter::report(&plans, &outcome.results);
        self.hooks.reported(&ctx, &reports)?;

        match &outcome.halt {
            Some(halt) => warn!(error = %halt, "Run halted"),
            None => info!(reports = reports.len(), "Run completed"),
        }

        Ok(RunOutput {
            runtime_id,
            dry: config.behavior.dry,
            artifacts,
            plans,
            results: outcome.results,
            reports,
            halt: outcome.halt,
        })
    }
}
