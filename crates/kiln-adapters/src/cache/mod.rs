//! Render cache adapters.
//!
//! | Strategy | Adapter | Lifetime |
//! |----------|---------|----------|
//! | `memory` | [`MemoryCache`] | process |
//! | `filesystem` | [`FilesystemCache`] | one JSON file per fingerprint |
//! | `none` | [`NoCache`] | never stores |

mod filesystem;
mod memory;

pub use filesystem::FilesystemCache;
pub use memory::MemoryCache;

use std::path::PathBuf;

use kiln_core::{
    application::ports::{ArtifactCache, CachedRender},
    domain::{CacheResolution, CacheTtl, Checksum},
    error::KilnResult,
};

/// Cache that never stores anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

impl ArtifactCache for NoCache {
    fn get(&self, _fingerprint: &Checksum) -> KilnResult<Option<CachedRender>> {
        Ok(None)
    }

    fn put(&self, _fingerprint: &Checksum, _entry: CachedRender) -> KilnResult<()> {
        Ok(())
    }
}

/// The adapter for a cache strategy.
pub fn for_strategy(
    resolution: CacheResolution,
    ttl: CacheTtl,
    dir: impl Into<PathBuf>,
) -> Box<dyn ArtifactCache> {
    match resolution {
        CacheResolution::Memory => Box::new(MemoryCache::new(ttl)),
        CacheResolution::Filesystem => Box::new(FilesystemCache::new(dir, ttl)),
        CacheResolution::None => Box::new(NoCache),
    }
}
