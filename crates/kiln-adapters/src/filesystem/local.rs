//! Local filesystem adapter using std::fs.

use std::io;
use std::path::Path;

use kiln_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{KilnError, KilnResult},
};

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Filesystem for LocalFilesystem {
    fn read_file(&self, path: &Path) -> KilnResult<String> {
        std::fs::read_to_string(path).map_err(|e| map_io_error(path, e, "read file"))
    }

    fn write_file(&self, path: &Path, content: &str) -> KilnResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| map_io_error(parent, e, "create directory"))?;
        }
        std::fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }

    fn remove_file(&self, path: &Path) -> KilnResult<()> {
        std::fs::remove_file(path).map_err(|e| map_io_error(path, e, "remove file"))
    }

    fn is_file_exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir_exists(&self, path: &Path) -> bool {
        path.is_dir()
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> KilnError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}
