//! Engine configuration.
//!
//! The engine never discovers or parses configuration itself; the CLI (or an
//! embedding host) resolves it into an [`EngineConfig`] with absolute paths.

use serde::{Deserialize, Serialize};

use crate::domain::{
    AbsolutePath, CacheResolution, CacheTtl, ConflictResolution, DomainError, ErrorResolution,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Behavior {
    /// Compute everything, write nothing.
    pub dry: bool,
    pub verbose: bool,
    /// Conflicted `remove` plans wait for a decision unless forced.
    pub confirm_before_delete: bool,
    /// Ask once before applying any plan.
    pub confirm_before_run: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheSettings {
    pub enabled: bool,
    pub ttl: CacheTtl,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl: CacheTtl::ONE_HOUR,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Strategy {
    pub cache_resolution: CacheResolution,
    pub conflict_resolution: ConflictResolution,
    pub error_resolution: ErrorResolution,
}

/// Resolved, absolute locations the engine works with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paths {
    pub cwd: AbsolutePath,
    pub cache: AbsolutePath,
    /// Root that relative destinations are joined onto.
    pub project: AbsolutePath,
    pub actions: AbsolutePath,
    pub generators: AbsolutePath,
    pub renderer_helpers: AbsolutePath,
    pub renderer_partials: AbsolutePath,
    pub templates: AbsolutePath,
}

impl Paths {
    /// Conventional layout under `cwd`: everything lives in `.kiln/`,
    /// generated files land in `cwd` itself.
    pub fn under(cwd: AbsolutePath) -> Self {
        let root = cwd.join(".kiln");
        Self {
            cache: root.join("cache"),
            project: cwd.clone(),
            actions: root.join("actions"),
            generators: root.join("generators"),
            renderer_helpers: root.join("helpers"),
            renderer_partials: root.join("partials"),
            templates: root.join("templates"),
            cwd,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub behavior: Behavior,
    pub cache: CacheSettings,
    pub paths: Paths,
    pub strategy: Strategy,
}

impl EngineConfig {
    /// Default configuration rooted at `cwd`.
    pub fn new(cwd: AbsolutePath) -> Self {
        Self {
            behavior: Behavior::default(),
            cache: CacheSettings::default(),
            paths: Paths::under(cwd),
            strategy: Strategy::default(),
        }
    }

    /// Same as [`EngineConfig::new`] for a path that is not yet known to be absolute.
    pub fn rooted_at(cwd: impl Into<std::path::PathBuf>) -> Result<Self, DomainError> {
        Ok(Self::new(AbsolutePath::try_new(cwd)?))
    }

    /// Whether the render cache is consulted at all.
    pub fn caching(&self) -> bool {
        self.cache.enabled && self.strategy.cache_resolution != CacheResolution::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn defaults_match_documented_values() {
        let config = EngineConfig::rooted_at("/work").unwrap();
        assert!(!config.behavior.dry);
        assert!(!config.behavior.confirm_before_delete);
        assert!(!config.behavior.confirm_before_run);
        assert!(config.cache.enabled);
        assert_eq!(config.cache.ttl, CacheTtl::ONE_HOUR);
        assert_eq!(config.strategy.cache_resolution, CacheResolution::Memory);
        assert_eq!(config.strategy.conflict_resolution, ConflictResolution::Ask);
        assert_eq!(config.strategy.error_resolution, ErrorResolution::Abort);
        assert_eq!(config.paths.project.as_path(), Path::new("/work"));
        assert_eq!(config.paths.templates.as_path(), Path::new("/work/.kiln/templates"));
    }

    #[test]
    fn caching_needs_flag_and_strategy() {
        let mut config = EngineConfig::rooted_at("/work").unwrap();
        assert!(config.caching());
        config.strategy.cache_resolution = CacheResolution::None;
        assert!(!config.caching());
        config.strategy.cache_resolution = CacheResolution::Filesystem;
        config.cache.enabled = false;
        assert!(!config.caching());
    }

    #[test]
    fn relative_root_is_rejected() {
        assert!(EngineConfig::rooted_at("work").is_err());
    }
}
