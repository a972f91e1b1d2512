//! Application layer errors.
//!
//! These errors represent failures in orchestration, not business logic.
//! Business logic errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::application::services::hooks::HookPoint;
use crate::domain::PlanId;
use crate::error::ErrorCategory;

/// Errors that occur during the generation pipeline.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationError {
    /// A template (destination, inline or file) failed to expand.
    #[error("Failed to render template '{template}': {reason}")]
    Render { template: String, reason: String },

    /// A conflicted plan reached apply without a resolution.
    #[error("Unresolved conflict at {path} (plan {plan_id})")]
    ConflictUnresolved { plan_id: PlanId, path: PathBuf },

    /// A conflicted plan was resolved with `abort`.
    #[error("Aborted on conflict at {path}")]
    ConflictAborted { path: PathBuf },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// A custom action delegate failed.
    #[error("Custom action '{action}' failed: {reason}")]
    Delegate { action: String, reason: String },

    /// A hook returned an error.
    #[error("Hook '{point}' failed: {reason}")]
    Hook { point: HookPoint, reason: String },

    #[error("Generator '{name}' not found")]
    GeneratorNotFound { name: String },

    #[error("Custom action '{name}' is not registered")]
    CustomActionNotFound { name: String },

    #[error("Template '{template}' not found")]
    TemplateNotFound { template: String },

    /// Artifact cache failure.
    #[error("Cache error: {reason}")]
    Cache { reason: String },

    /// Store access failed (lock poisoned, etc.).
    #[error("Store lock poisoned")]
    StoreLockError,

    /// The run was cancelled before it finished.
    #[error("Run cancelled")]
    Cancelled,

    /// Validation failed (application-level, not domain).
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Render { template, .. } => vec![
                format!("Check the template '{}'", template),
                "Every {{variable}} must have an answer (pass --set name=value)".into(),
            ],
            Self::ConflictUnresolved { path, .. } => vec![
                format!("{} already exists with different content", path.display()),
                "Re-run with --conflict overwrite or --conflict skip".into(),
                "Or run interactively to decide per file".into(),
            ],
            Self::ConflictAborted { path } => vec![
                format!("Stopped at {}", path.display()),
                "Use --conflict overwrite to replace existing files".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
            ],
            Self::GeneratorNotFound { name } => vec![
                format!("No generator named '{}'", name),
                "Try: kiln list to see available generators".into(),
            ],
            Self::CustomActionNotFound { name } => vec![
                format!("Register an action named '{}' in the actions directory", name),
            ],
            Self::TemplateNotFound { template } => vec![
                format!("Looked for '{}' in the templates directory", template),
                "Check paths.templates in your configuration".into(),
            ],
            Self::StoreLockError => vec![
                "A shared store is locked".into(),
                "Try again in a moment".into(),
            ],
            Self::Cancelled => vec!["Nothing after the cancellation point was applied".into()],
            _ => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConflictUnresolved { .. } | Self::ConflictAborted { .. } | Self::Cancelled => {
                ErrorCategory::Conflict
            }
            Self::GeneratorNotFound { .. }
            | Self::CustomActionNotFound { .. }
            | Self::TemplateNotFound { .. } => ErrorCategory::NotFound,
            Self::Render { .. } | Self::ValidationFailed(_) => ErrorCategory::Validation,
            Self::Hook { .. } | Self::Delegate { .. } => ErrorCategory::Validation,
            Self::FilesystemError { .. } | Self::Cache { .. } | Self::StoreLockError => {
                ErrorCategory::Internal
            }
        }
    }
}
