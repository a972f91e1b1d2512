//! Infrastructure adapters for Kiln.
//!
//! This crate implements the ports defined in `kiln_core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod cache;
pub mod catalog_loader;
pub mod decisions;
pub mod filesystem;
pub mod renderer;

// Re-export commonly used adapters
pub use cache::{FilesystemCache, MemoryCache, NoCache};
pub use catalog_loader::FilesystemCatalogLoader;
pub use decisions::NonInteractive;
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use renderer::SimpleRenderer;
