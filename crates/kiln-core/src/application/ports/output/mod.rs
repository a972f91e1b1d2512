//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the pipeline needs from external systems.
//! The `kiln-adapters` crate provides implementations.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::application::catalog::ResourceCatalog;
use crate::domain::{ActionConfig, Answers, Checksum, ConflictResolution, Plan};
use crate::error::KilnResult;

/// Error type custom action delegates may return.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `kiln_adapters::filesystem::LocalFilesystem` (production)
/// - `kiln_adapters::filesystem::MemoryFilesystem` (testing, dry previews)
///
/// Absence is reported through the `is_*_exists` probes, never as an error.
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Read a whole file as UTF-8.
    fn read_file(&self, path: &Path) -> KilnResult<String>;

    /// Write content to a file, creating parent directories.
    fn write_file(&self, path: &Path, content: &str) -> KilnResult<()>;

    /// Remove a single file.
    fn remove_file(&self, path: &Path) -> KilnResult<()>;

    fn is_file_exists(&self, path: &Path) -> bool;

    fn is_dir_exists(&self, path: &Path) -> bool;
}

/// Read `path` if it is a file, `None` if it is absent.
pub fn read_existing(fs: &dyn Filesystem, path: &Path) -> KilnResult<Option<String>> {
    if fs.is_file_exists(path) {
        fs.read_file(path).map(Some)
    } else {
        Ok(None)
    }
}

/// Port for template expansion.
///
/// Implemented by:
/// - `kiln_adapters::renderer::SimpleRenderer` (placeholder substitution)
#[cfg_attr(test, mockall::automock)]
pub trait TemplateRenderer: Send + Sync {
    /// Expand `template` with `answers`; partials and helpers come from `catalog`.
    fn render(
        &self,
        template: &str,
        answers: &Answers,
        catalog: &ResourceCatalog,
    ) -> KilnResult<String>;
}

/// A custom action type.
///
/// The returned string becomes the artifact's final content.
pub trait ActionDelegate: Send + Sync {
    fn run(
        &self,
        answers: &Answers,
        config: &ActionConfig,
        fs: &dyn Filesystem,
    ) -> Result<String, BoxError>;
}

impl<F> ActionDelegate for F
where
    F: Fn(&Answers, &ActionConfig, &dyn Filesystem) -> Result<String, BoxError> + Send + Sync,
{
    fn run(
        &self,
        answers: &Answers,
        config: &ActionConfig,
        fs: &dyn Filesystem,
    ) -> Result<String, BoxError> {
        self(answers, config, fs)
    }
}

/// A stored render, keyed by the fingerprint of its inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedRender {
    pub raw_content: String,
    pub final_content: String,
    pub checksum: Checksum,
}

impl CachedRender {
    /// Whether the stored checksum still matches the stored content.
    pub fn is_intact(&self) -> bool {
        self.checksum.matches(&self.final_content)
    }
}

/// Port for the render cache.
///
/// Implemented by:
/// - `kiln_adapters::cache::MemoryCache`
/// - `kiln_adapters::cache::FilesystemCache`
/// - `kiln_adapters::cache::NoCache`
#[cfg_attr(test, mockall::automock)]
pub trait ArtifactCache: Send + Sync {
    fn get(&self, fingerprint: &Checksum) -> KilnResult<Option<CachedRender>>;

    fn put(&self, fingerprint: &Checksum, entry: CachedRender) -> KilnResult<()>;
}

/// Port for decisions the pipeline cannot make on its own.
///
/// Implemented by:
/// - `kiln_adapters::decisions::NonInteractive` (never decides, always confirms)
/// - the CLI's dialoguer-backed provider
#[cfg_attr(test, mockall::automock)]
pub trait DecisionProvider: Send + Sync {
    /// Decide a pending conflict. `None` leaves it pending.
    fn resolve_conflict(&self, plan: &Plan) -> KilnResult<Option<ConflictResolution>>;

    /// Confirm the whole plan list before anything is applied.
    fn confirm_run(&self, plans: &[Plan]) -> KilnResult<bool>;
}
