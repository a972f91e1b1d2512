pub mod artifact;
pub mod common;
pub mod generator;
pub mod outcome;
pub mod plan;
pub mod prompt;
pub mod report;

pub use crate::domain::DomainError;
pub use artifact::{ActionFlags, Artifact, Provenance};
pub use common::{AbsolutePath, GeneratorName, RelativePath};
pub use generator::{Action, ActionConfig, ActionTemplate, GeneratorMeta, GeneratorResource};
pub use outcome::{ApplyResult, ErrorSnapshot, Execution};
pub use plan::{ConflictSnapshot, Plan};
pub use prompt::{
    AnswerValue, Answers, ConfirmPrompt, Prompt, SelectOption, SelectPrompt, TextPrompt,
};
pub use report::Report;
