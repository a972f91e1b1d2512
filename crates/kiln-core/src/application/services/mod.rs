//! Application services - orchestrate use cases.
//!
//! The pipeline stages (render, plan, apply, report) are plain structs that
//! borrow their ports; [`GenerateService`] owns the ports and runs the stages
//! in order with the hooks in between.

pub mod catalog_service;
pub mod executor;
pub mod generate_service;
pub mod hooks;
pub mod planner;
pub mod renderer;
pub mod reporter;

pub use catalog_service::{CatalogService, GeneratorInfo};
pub use executor::{CancellationToken, ExecutionOutcome, Executor};
pub use generate_service::{GenerateRequest, GenerateService, RunOutput};
pub use hooks::{
    Environment, HookContext, HookPoint, HookRegistry, HookResult, RunContext, RuntimeInfo,
};
pub use planner::{PlanBuilder, resolve_pending, unified_diff};
pub use renderer::{ArtifactRenderer, CURRENT_CONTENT_ANSWER, RenderScope};
pub use reporter::Reporter;
