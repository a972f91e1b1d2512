//! Process-lifetime render cache.

use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
    time::Instant,
};

use tracing::debug;

use kiln_core::{
    application::{
        ApplicationError,
        ports::{ArtifactCache, CachedRender},
    },
    domain::{CacheTtl, Checksum},
    error::KilnResult,
};

/// In-memory cache with a TTL. Clones share entries.
#[derive(Debug, Clone)]
pub struct MemoryCache {
    ttl: CacheTtl,
    entries: Arc<RwLock<HashMap<Checksum, (Instant, CachedRender)>>>,
}

impl MemoryCache {
    pub fn new(ttl: CacheTtl) -> Self {
        Self {
            ttl,
            entries: Arc::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(CacheTtl::default())
    }
}

impl ArtifactCache for MemoryCache {
    fn get(&self, fingerprint: &Checksum) -> KilnResult<Option<CachedRender>> {
        let expired = {
            let entries = self
                .entries
                .read()
                .map_err(|_| ApplicationError::StoreLockError)?;
            match entries.get(fingerprint) {
                None => return Ok(None),
                Some((stored_at, entry)) if !self.ttl.is_expired(stored_at.elapsed()) => {
                    return Ok(Some(entry.clone()));
                }
                Some(_) => true,
            }
        };

        if expired {
            debug!(fingerprint = %fingerprint.short(), "Evicting expired cache entry");
            self.entries
                .write()
                .map_err(|_| ApplicationError::StoreLockError)?
                .remove(fingerprint);
        }
        Ok(None)
    }

    fn put(&self, fingerprint: &Checksum, entry: CachedRender) -> KilnResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        let before = entries.len();
        entries.retain(|_, (stored_at, _)| !self.ttl.is_expired(stored_at.elapsed()));
        if entries.len() < before {
            debug!(evicted = before - entries.len(), "Swept expired cache entries");
        }
        entries.insert(fingerprint.clone(), (Instant::now(), entry));
        Ok(())
    }
}
