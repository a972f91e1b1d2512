//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `kiln-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by the pipeline, implemented by infrastructure
//!   - `Filesystem`: File operations
//!   - `TemplateRenderer`: Template expansion
//!   - `ActionDelegate`: Custom action types
//!   - `ArtifactCache`: Render cache
//!   - `DecisionProvider`: Conflict decisions and run confirmation
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (`GenerateService` and `CatalogService`)

pub mod output;

pub use output::{
    ActionDelegate, ArtifactCache, BoxError, CachedRender, DecisionProvider, Filesystem,
    TemplateRenderer, read_existing,
};
