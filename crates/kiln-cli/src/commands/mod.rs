//! Command handlers.
//!
//! Each handler turns parsed arguments into calls on `kiln-core` services
//! and prints the outcome.  No pipeline logic lives here.

pub mod completions;
pub mod config;
pub mod generate;
pub mod init;
pub mod list;
pub mod show;

use std::path::{Path, PathBuf};

use tracing::debug;

use kiln_adapters::FilesystemCatalogLoader;
use kiln_core::application::{EngineConfig, ResourceCatalog};

use crate::{
    config::AppConfig,
    error::{CliResult, IntoCli},
};

/// The working directory, absolute.  `-C DIR` wins over the process cwd.
pub fn working_dir(requested: Option<&Path>) -> CliResult<PathBuf> {
    let current = std::env::current_dir().with_cli_context(|| "cannot read current directory")?;
    Ok(match requested {
        Some(dir) if dir.is_absolute() => dir.to_path_buf(),
        Some(dir) => current.join(dir),
        None => current,
    })
}

/// Resolved engine configuration plus the catalog found on disk.
pub struct Workspace {
    pub engine: EngineConfig,
    pub catalog: ResourceCatalog,
}

impl Workspace {
    pub fn load(config: &AppConfig, cwd: &Path) -> CliResult<Self> {
        let engine = config.into_engine_config(cwd)?;
        let catalog = FilesystemCatalogLoader::new(&engine.paths).load()?;
        debug!(
            root = %engine.paths.cwd.as_path().display(),
            generators = catalog.generators().count(),
            "Workspace loaded"
        );
        Ok(Self { engine, catalog })
    }
}
