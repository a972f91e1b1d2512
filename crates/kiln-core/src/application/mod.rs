//! Application layer for Kiln.
//!
//! This layer contains:
//! - **Services**: the generation pipeline and catalog queries
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Catalog**: the resolved resources a run works against
//! - **Config**: the resolved engine configuration
//! - **Errors**: Application-specific error types
//!
//! Business rules about generators and actions live in `crate::domain`.

pub mod catalog;
pub mod config;
pub mod error;
pub mod ports;
pub mod services;

pub use services::{
    CatalogService, GenerateRequest, GenerateService, GeneratorInfo, HookContext, HookPoint,
    HookRegistry, RunOutput,
};

pub use catalog::{CatalogBuilder, CustomAction, HelperFn, ResourceCatalog, TemplateResource};
pub use config::{Behavior, CacheSettings, EngineConfig, Paths, Strategy};

// Re-export port traits (for adapter implementation)
pub use ports::{ActionDelegate, ArtifactCache, DecisionProvider, Filesystem, TemplateRenderer};

pub use error::ApplicationError;
