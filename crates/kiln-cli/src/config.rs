//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the engine only ever sees the [`EngineConfig`]
//! it is resolved into.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (applied by the command, not here)
//! 2. `KILN_*` environment variables, `__` between sections:
//!    `KILN_STRATEGY__CONFLICT_RESOLUTION=overwrite`
//! 3. `--config FILE`, or else `./kiln.toml` over the user config file
//! 4. Built-in defaults

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::debug;

use kiln_core::{
    application::{Behavior, CacheSettings, EngineConfig, Paths, Strategy},
    domain::AbsolutePath,
};

use crate::error::{CliError, CliResult};

/// Name of the project-local configuration file.
pub const LOCAL_CONFIG_FILE: &str = "kiln.toml";

const ENV_PREFIX: &str = "KILN";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub behavior: Behavior,
    pub cache: CacheSettings,
    pub strategy: Strategy,
    pub paths: PathsConfig,
    pub output: OutputConfig,

    /// Files that contributed, lowest priority first.
    #[serde(skip)]
    pub sources: Vec<PathBuf>,
}

/// Resource locations.  Relative paths are resolved against the working
/// directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory holding generators, partials, templates and the cache.
    pub root: PathBuf,
    /// Where relative destinations land.
    pub project: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generators: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partials: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub templates: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub no_color: bool,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(".kiln"),
            project: PathBuf::from("."),
            cache: None,
            generators: None,
            partials: None,
            templates: None,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            behavior: Behavior::default(),
            cache: CacheSettings::default(),
            strategy: Strategy::default(),
            paths: PathsConfig::default(),
            output: OutputConfig::default(),
            sources: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Load defaults, files and environment, in that order.
    ///
    /// `explicit` is the `--config` path; when given it must exist and
    /// replaces file discovery.
    pub fn load(explicit: Option<&Path>, cwd: &Path) -> CliResult<Self> {
        let files = match explicit {
            Some(path) => {
                if !path.is_file() {
                    return Err(CliError::ConfigError {
                        message: format!("config file '{}' does not exist", path.display()),
                        source: None,
                    });
                }
                vec![path.to_path_buf()]
            }
            None => Self::discover(cwd),
        };

        let defaults = Config::try_from(&Self::default()).map_err(config_error)?;
        let mut builder = Config::builder().add_source(defaults);
        for file in &files {
            debug!(file = %file.display(), "Reading configuration file");
            builder = builder.add_source(File::from(file.as_path()).format(FileFormat::Toml));
        }
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let mut config: Self = builder
            .build()
            .and_then(Config::try_deserialize)
            .map_err(config_error)?;
        config.sources = files;
        Ok(config)
    }

    /// Existing config files, lowest priority first.
    fn discover(cwd: &Path) -> Vec<PathBuf> {
        let local = cwd.join(LOCAL_CONFIG_FILE);
        Self::user_config_path()
            .into_iter()
            .chain(std::iter::once(local))
            .filter(|p| p.is_file())
            .collect()
    }

    /// Per-user configuration file, if the platform has a config directory.
    pub fn user_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("dev", "kiln", "kiln")
            .map(|d| d.config_dir().join("config.toml"))
    }

    /// Resolve into the engine's configuration, rooted at `cwd`.
    pub fn into_engine_config(&self, cwd: &Path) -> CliResult<EngineConfig> {
        let cwd = AbsolutePath::try_new(cwd).map_err(|e| CliError::Core(e.into()))?;
        let root = AbsolutePath::resolve(&cwd, &self.paths.root);
        let under_root = |custom: &Option<PathBuf>, default: &str| match custom {
            Some(path) => AbsolutePath::resolve(&cwd, path),
            None => root.join(default),
        };

        let paths = Paths {
            cache: under_root(&self.paths.cache, "cache"),
            project: AbsolutePath::resolve(&cwd, &self.paths.project),
            actions: root.join("actions"),
            generators: under_root(&self.paths.generators, "generators"),
            renderer_helpers: root.join("helpers"),
            renderer_partials: under_root(&self.paths.partials, "partials"),
            templates: under_root(&self.paths.templates, "templates"),
            cwd: cwd.clone(),
        };

        Ok(EngineConfig {
            behavior: self.behavior,
            cache: self.cache,
            paths,
            strategy: self.strategy,
        })
    }

    /// Look up one value by dotted key, e.g. `strategy.conflict_resolution`.
    pub fn get(&self, key: &str) -> CliResult<String> {
        let tree = serde_json::to_value(self).map_err(|e| CliError::ConfigError {
            message: format!("Failed to serialise config: {e}"),
            source: Some(Box::new(e)),
        })?;

        let value = key
            .split('.')
            .try_fold(&tree, |node, part| node.get(part))
            .filter(|v| !v.is_object())
            .ok_or_else(|| CliError::ConfigError {
                message: format!("Unknown config key: '{key}'"),
                source: None,
            })?;

        Ok(match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }

    /// The configuration as it would be written to `kiln.toml`.
    pub fn to_toml(&self) -> CliResult<String> {
        toml::to_string_pretty(self).map_err(|e| CliError::ConfigError {
            message: format!("Failed to serialise config: {e}"),
            source: Some(Box::new(e)),
        })
    }
}

fn config_error(e: config::ConfigError) -> CliError {
    CliError::ConfigError {
        message: e.to_string(),
        source: Some(Box::new(e)),
    }
}
