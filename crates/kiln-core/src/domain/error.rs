// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (results and reports carry copies)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("Invalid generator '{name}': {reason}")]
    InvalidGenerator { name: String, reason: String },

    #[error("Generator '{name}' has no actions")]
    EmptyGenerator { name: String },

    #[error("Invalid action #{index} in generator '{generator}': {reason}")]
    InvalidAction {
        generator: String,
        index: usize,
        reason: String,
    },

    #[error("Duplicate prompt '{prompt}' in generator '{generator}'")]
    DuplicatePrompt { generator: String, prompt: String },

    #[error("Duplicate {kind} '{name}' in catalog")]
    DuplicateResource { kind: &'static str, name: String },

    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    #[error("Path must be absolute: {path}")]
    RelativePathNotAllowed { path: String },

    // ========================================================================
    // Parsing Errors
    // ========================================================================
    #[error("Unknown {kind} strategy '{value}' (expected one of: {expected})")]
    UnknownStrategy {
        kind: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("Unknown template kind '{0}' (expected 'file' or 'raw')")]
    UnknownTemplateKind(String),

    #[error("Action type cannot be empty")]
    EmptyActionType,

    // ========================================================================
    // Constraint Violations
    // ========================================================================
    #[error("Required field missing: {field}")]
    MissingRequiredField { field: &'static str },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidGenerator { name, reason } => vec![
                format!("Check the definition of generator '{}'", name),
                format!("Details: {}", reason),
            ],
            Self::EmptyGenerator { name } => vec![
                format!("Generator '{}' does nothing without actions", name),
                "Add at least one [[actions]] entry to its manifest".into(),
            ],
            Self::InvalidAction { generator, index, .. } => vec![
                format!("Review action #{} of generator '{}'", index, generator),
                "Built-in action types: add, append, copy, modify, move, remove".into(),
            ],
            Self::UnknownStrategy { kind, expected, .. } => vec![
                format!("Valid {} strategies: {}", kind, expected),
                "Check your configuration file and KILN_* environment variables".into(),
            ],
            Self::AbsolutePathNotAllowed { path } => vec![
                format!("'{}' must be relative to the project root", path),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownStrategy { .. } | Self::UnknownTemplateKind(_) => {
                ErrorCategory::Configuration
            }
            Self::DuplicateResource { .. } => ErrorCategory::Conflict,
            _ => ErrorCategory::Validation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Conflict,
    Configuration,
    NotFound,
    Internal,
}
