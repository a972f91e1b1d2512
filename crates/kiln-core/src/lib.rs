//! Kiln Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the Kiln
//! scaffolding engine. A generator is a named list of prompts and file
//! actions; running one goes through four stages:
//!
//! ```text
//!   catalog + answers
//!          │
//!          ▼
//!   ┌─────────────┐  artifacts  ┌─────────────┐  plans  ┌─────────────┐
//!   │   Render    │────────────▶│    Plan     │────────▶│    Apply    │
//!   └─────────────┘             └─────────────┘         └──────┬──────┘
//!                                                              │ results
//!                                                              ▼
//!                                                       ┌─────────────┐
//!                                                       │   Report    │
//!                                                       └─────────────┘
//! ```
//!
//! Hooks observe or transform the data between stages. Everything that
//! touches the outside world (filesystem, template engine, cache, user
//! decisions) goes through a port in [`application::ports`]; `kiln-adapters`
//! provides the implementations.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use kiln_core::prelude::*;
//!
//! let service = GenerateService::new(config, catalog, renderer, filesystem, decisions);
//! let output = service
//!     .run(GenerateRequest::new("component", cwd).with_answers(answers))?
//!     .into_result()?;
//! for report in &output.reports {
//!     println!("{} {}", report.status, report.provenance.destination_path.display());
//! }
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        CatalogService, EngineConfig, GenerateRequest, GenerateService, GeneratorInfo,
        HookRegistry, ResourceCatalog, RunOutput,
        ports::{ArtifactCache, DecisionProvider, Filesystem, TemplateRenderer},
    };
    pub use crate::domain::{
        Action, AnswerValue, Answers, Artifact, ConflictResolution, ErrorResolution,
        GeneratorName, GeneratorResource, Plan, Prompt, Report, ResultStatus,
    };
    pub use crate::error::{KilnError, KilnResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
