// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Kiln.
//!
//! Generators, actions and prompts describe *what* to produce; artifacts,
//! plans, results and reports are the records the pipeline passes along.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or external calls
//! - **Immutable records**: artifacts keep content and checksum in lockstep
//! - **Nominal ids**: every record kind has its own id newtype
//!
pub mod checksum;
pub mod entities;
pub mod error;
pub mod ids;
pub mod value_objects;

mod validation;

pub use checksum::Checksum;
pub use entities::{
    AbsolutePath, Action, ActionConfig, ActionFlags, ActionTemplate, AnswerValue, Answers, ApplyResult,
    Artifact, ConfirmPrompt, ConflictSnapshot, ErrorSnapshot, Execution, GeneratorMeta,
    GeneratorName, GeneratorResource, Plan, Prompt, Provenance, RelativePath, Report,
    SelectOption, SelectPrompt, TextPrompt,
};
pub use error::{DomainError, ErrorCategory};
pub use ids::{ArtifactId, PlanId, ReportId, ResultId, RuntimeId};
pub use validation::DomainValidator;
pub use value_objects::{
    ActionKind, BuiltinAction, CacheResolution, CacheTtl, ConflictResolution, ErrorResolution,
    Origin, ResultStatus, TemplateKind,
};
