//! Filesystem-based catalog loader.
//!
//! Reads generator manifests, partials and templates from the directories in
//! [`Paths`] and builds a [`ResourceCatalog`].
//!
//! # Directory layout expected
//!
//! ```text
//! .kiln/
//! ├── generators/
//! │   ├── component.toml     ← one generator per manifest
//! │   └── note.toml
//! ├── partials/
//! │   └── license.hbs        ← partial "license"
//! └── templates/
//!     └── component/
//!         └── index.tsx      ← template "component/index.tsx" (dot name "component.index.tsx")
//! ```
//!
//! # Generator manifest format
//!
//! ```toml
//! name        = "component"
//! description = "React component with a test"
//!
//! [[prompts]]
//! type    = "text"
//! name    = "name"
//! message = "Component name?"
//!
//! [[actions]]
//! type        = "add"
//! destination = "src/{{kebabCase name}}/index.tsx"
//! template    = { kind = "file", source_or_content = "component/index.tsx" }
//! ```
//!
//! Helpers and custom actions are Rust closures, so they cannot come from
//! disk. Register them on the [`CatalogBuilder`] handed to
//! [`FilesystemCatalogLoader::load_into`].

use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, info, instrument, warn};
use walkdir::WalkDir;

use kiln_core::{
    application::{CatalogBuilder, Paths, ResourceCatalog, TemplateResource},
    domain::{GeneratorMeta, GeneratorResource, Origin},
    error::{KilnError, KilnResult},
};

/// Extension of generator manifests.
pub const MANIFEST_EXTENSION: &str = "toml";

/// Loads a catalog from the configured resource directories.
///
/// # Example
///
/// ```rust,no_run
/// use kiln_adapters::FilesystemCatalogLoader;
/// use kiln_core::application::EngineConfig;
///
/// let config = EngineConfig::rooted_at("/work/project").unwrap();
/// let catalog = FilesystemCatalogLoader::new(&config.paths).load().unwrap();
/// println!("Loaded {} generators", catalog.generators().count());
/// ```
#[derive(Debug, Clone)]
pub struct FilesystemCatalogLoader {
    generators_dir: PathBuf,
    partials_dir: PathBuf,
    templates_dir: PathBuf,
}

impl FilesystemCatalogLoader {
    pub fn new(paths: &Paths) -> Self {
        Self {
            generators_dir: paths.generators.as_path().to_path_buf(),
            partials_dir: paths.renderer_partials.as_path().to_path_buf(),
            templates_dir: paths.templates.as_path().to_path_buf(),
        }
    }

    /// Load everything on disk into a fresh catalog.
    pub fn load(&self) -> KilnResult<ResourceCatalog> {
        self.load_into(ResourceCatalog::builder())
    }

    /// Add everything on disk to `builder`, then build.
    ///
    /// Missing directories contribute nothing. Manifests that cannot be
    /// parsed are skipped with a `WARN` log; generators that parse but are
    /// invalid, and duplicate names, fail the whole catalog.
    #[instrument(skip_all, fields(generators = %self.generators_dir.display()))]
    pub fn load_into(&self, mut builder: CatalogBuilder) -> KilnResult<ResourceCatalog> {
        let mut counts = (0usize, 0usize, 0usize);

        for path in files_under(&self.generators_dir)? {
            if path.extension().and_then(|e| e.to_str()) != Some(MANIFEST_EXTENSION) {
                continue;
            }
            match load_manifest(&path) {
                Ok(generator) => {
                    debug!(name = %generator.name, path = %path.display(), "loaded generator");
                    builder = builder.generator(generator);
                    counts.0 += 1;
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping generator manifest");
                }
            }
        }

        for path in files_under(&self.partials_dir)? {
            let name = dotted_name(&self.partials_dir, &path);
            builder = builder.partial(name, read(&path)?);
            counts.1 += 1;
        }

        for path in files_under(&self.templates_dir)? {
            let relative = path.strip_prefix(&self.templates_dir).unwrap_or(&path);
            builder = builder.template(TemplateResource::new(relative, &path, read(&path)?));
            counts.2 += 1;
        }

        let catalog = builder.build()?;
        info!(
            generators = counts.0,
            partials = counts.1,
            templates = counts.2,
            "catalog loaded"
        );
        Ok(catalog)
    }
}

/// Parse one manifest into an external generator.
pub fn load_manifest(path: &Path) -> KilnResult<GeneratorResource> {
    let raw = read(path)?;
    let mut generator: GeneratorResource =
        toml::from_str(&raw).map_err(|e| KilnError::Configuration {
            message: format!("failed to parse '{}': {e}", path.display()),
        })?;
    generator.meta = GeneratorMeta {
        origin: Origin::External,
        source_path: Some(path.to_path_buf()),
    };
    Ok(generator)
}

/// Regular files below `dir`, sorted; empty if `dir` does not exist.
fn files_under(dir: &Path) -> KilnResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        debug!(dir = %dir.display(), "resource directory absent");
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| KilnError::Configuration {
            message: format!("failed to read '{}': {e}", dir.display()),
        })?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn read(path: &Path) -> KilnResult<String> {
    fs::read_to_string(path).map_err(|e| KilnError::Configuration {
        message: format!("failed to read '{}': {e}", path.display()),
    })
}

/// `a/b/c.hbs` under `base` → `a.b.c`.
fn dotted_name(base: &Path, path: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .with_extension("")
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join(".")
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_core::{
        application::EngineConfig,
        domain::{ActionKind, BuiltinAction, DomainError, Prompt, TemplateKind},
    };
    use tempfile::TempDir;

    const NOTE_MANIFEST: &str = r#"
name = "note"
description = "A markdown note"

[[prompts]]
type = "text"
name = "title"
message = "Title?"
default_value = "untitled"

[[actions]]
type = "add"
destination = "notes/{{kebabCase title}}.md"
template = { kind = "file", source_or_content = "note.md" }
"#;

    fn project() -> (TempDir, EngineConfig) {
        let temp = TempDir::new().unwrap();
        let config = EngineConfig::rooted_at(temp.path()).unwrap();
        (temp, config)
    }

    fn write(path: impl AsRef<Path>, content: &str) {
        let path = path.as_ref();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn empty_project_loads_empty_catalog() {
        let (_temp, config) = project();
        let catalog = FilesystemCatalogLoader::new(&config.paths).load().unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn loads_generators_partials_and_templates() {
        let (_temp, config) = project();
        let paths = &config.paths;
        write(paths.generators.join("note.toml"), NOTE_MANIFEST);
        write(paths.generators.join("README.md"), "ignored");
        write(paths.renderer_partials.join("legal/license.hbs"), "MIT");
        write(paths.templates.join("note.md"), "# {{title}}");

        let catalog = FilesystemCatalogLoader::new(paths).load().unwrap();

        let note = catalog.generator("note").unwrap();
        assert_eq!(note.description, "A markdown note");
        assert_eq!(note.meta.origin, Origin::External);
        assert_eq!(
            note.meta.source_path.as_deref(),
            Some(paths.generators.join("note.toml").as_path())
        );
        assert!(matches!(note.prompts[0], Prompt::Text(_)));
        assert_eq!(note.actions[0].kind, ActionKind::Builtin(BuiltinAction::Add));
        assert_eq!(note.actions[0].template.kind, TemplateKind::File);

        assert_eq!(catalog.partial("legal.license"), Some("MIT"));
        assert_eq!(catalog.find_template("note.md").unwrap().raw_content, "# {{title}}");
    }

    #[test]
    fn malformed_manifest_is_skipped() {
        let (_temp, config) = project();
        write(config.paths.generators.join("bad.toml"), "name = ");
        write(config.paths.generators.join("note.toml"), NOTE_MANIFEST);

        let catalog = FilesystemCatalogLoader::new(&config.paths).load().unwrap();
        assert_eq!(catalog.generators().count(), 1);
    }

    #[test]
    fn invalid_generator_fails_the_catalog() {
        let (_temp, config) = project();
        write(
            &config.paths.generators.join("empty.toml"),
            "name = \"empty\"\nactions = []\n",
        );

        let err = FilesystemCatalogLoader::new(&config.paths).load().unwrap_err();
        assert!(matches!(err, KilnError::Domain(DomainError::EmptyGenerator { .. })));
    }

    #[test]
    fn programmatic_resources_merge_with_disk() {
        let (_temp, config) = project();
        write(config.paths.generators.join("note.toml"), NOTE_MANIFEST);

        let builder = ResourceCatalog::builder().helper("shout", |s: &str| s.to_uppercase());
        let catalog = FilesystemCatalogLoader::new(&config.paths)
            .load_into(builder)
            .unwrap();

        assert!(catalog.generator("note").is_some());
        assert!(catalog.helper("shout").is_some());
    }

    #[test]
    fn dotted_names() {
        let base = Path::new("/t");
        assert_eq!(dotted_name(base, Path::new("/t/a/b.hbs")), "a.b");
        assert_eq!(dotted_name(base, Path::new("/t/top")), "top");
    }
}
