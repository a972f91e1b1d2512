//! Render cache persisted as JSON files.

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use kiln_core::{
    application::{
        ApplicationError,
        ports::{ArtifactCache, CachedRender},
    },
    domain::{CacheTtl, Checksum},
    error::{KilnError, KilnResult},
};

/// On-disk layout of one entry.
#[derive(Debug, Serialize, Deserialize)]
struct StoredEntry {
    stored_at: DateTime<Utc>,
    #[serde(flatten)]
    render: CachedRender,
}

/// Cache that keeps one `<fingerprint>.json` per entry under `dir`.
///
/// Entries older than the TTL are deleted when read. Unreadable entries are
/// treated as misses.
#[derive(Debug, Clone)]
pub struct FilesystemCache {
    dir: PathBuf,
    ttl: CacheTtl,
}

impl FilesystemCache {
    pub fn new(dir: impl Into<PathBuf>, ttl: CacheTtl) -> Self {
        Self {
            dir: dir.into(),
            ttl,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, fingerprint: &Checksum) -> PathBuf {
        self.dir.join(format!("{}.json", fingerprint.as_str()))
    }

    fn evict(&self, path: &Path) {
        if let Err(e) = fs::remove_file(path) {
            warn!(path = %path.display(), error = %e, "Failed to evict cache entry");
        }
    }
}

fn cache_error(path: &Path, e: impl std::fmt::Display) -> KilnError {
    ApplicationError::Cache {
        reason: format!("{}: {}", path.display(), e),
    }
    .into()
}

impl ArtifactCache for FilesystemCache {
    fn get(&self, fingerprint: &Checksum) -> KilnResult<Option<CachedRender>> {
        let path = self.entry_path(fingerprint);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(cache_error(&path, e)),
        };

        let stored: StoredEntry = match serde_json::from_str(&raw) {
            Ok(stored) => stored,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Discarding unreadable cache entry");
                self.evict(&path);
                return Ok(None);
            }
        };

        // a timestamp in the future counts as fresh
        let age = (Utc::now() - stored.stored_at).to_std().unwrap_or_default();
        if self.ttl.is_expired(age) {
            debug!(fingerprint = %fingerprint.short(), "Evicting expired cache entry");
            self.evict(&path);
            return Ok(None);
        }

        Ok(Some(stored.render))
    }

    fn put(&self, fingerprint: &Checksum, entry: CachedRender) -> KilnResult<()> {
        fs::create_dir_all(&self.dir).map_err(|e| cache_error(&self.dir, e))?;

        let path = self.entry_path(fingerprint);
        let stored = StoredEntry {
            stored_at: Utc::now(),
            render: entry,
        };
        let json = serde_json::to_string_pretty(&stored).map_err(|e| cache_error(&path, e))?;
        fs::write(&path, json).map_err(|e| cache_error(&path, e))
    }
}
