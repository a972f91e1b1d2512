//! `kiln init`: create `kiln.toml` and the resource directories.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::{
    cli::InitArgs,
    config::{AppConfig, LOCAL_CONFIG_FILE},
    error::{CliResult, IntoCli},
    output::OutputManager,
};

const EXAMPLE_GENERATOR: &str = r#"name = "note"
description = "A markdown note"

[[prompts]]
type = "text"
name = "title"
message = "Title?"
required = true

[[prompts]]
type = "confirm"
name = "draft"
message = "Mark as draft?"
initial_value = true

[[actions]]
type = "add"
destination = "notes/{{kebabCase title}}.md"
template = { kind = "file", source_or_content = "note.md" }
"#;

const EXAMPLE_TEMPLATE: &str = "# {{title}}\n\ndraft: {{draft}}\n";

/// Write a default configuration, the resource directories and, with
/// `--example`, a small generator to start from.
pub fn execute(
    args: InitArgs,
    config: AppConfig,
    cwd: &Path,
    output: OutputManager,
) -> CliResult<()> {
    let config_path = cwd.join(LOCAL_CONFIG_FILE);

    if config_path.exists() && !args.force {
        output.warning(&format!(
            "Config already exists at {}  (use --force to overwrite)",
            config_path.display(),
        ))?;
        return Ok(());
    }

    let toml = AppConfig::default().to_toml()?;
    fs::write(&config_path, toml)
        .with_cli_context(|| format!("Failed to write config to '{}'", config_path.display()))?;
    output.success(&format!("Configuration created at {}", config_path.display()))?;

    // Directories follow whatever configuration was already in effect.
    let engine = config.into_engine_config(cwd)?;
    let paths = &engine.paths;
    for dir in [&paths.generators, &paths.renderer_partials, &paths.templates] {
        fs::create_dir_all(dir.as_path())
            .with_cli_context(|| format!("Failed to create '{}'", dir.as_path().display()))?;
        debug!(dir = %dir.as_path().display(), "Resource directory ready");
    }

    if args.example {
        let files = [
            (paths.generators.join("note.toml"), EXAMPLE_GENERATOR),
            (paths.templates.join("note.md"), EXAMPLE_TEMPLATE),
        ];
        for (path, content) in files {
            let path = path.as_path();
            if path.exists() && !args.force {
                output.warning(&format!("Keeping existing {}", path.display()))?;
                continue;
            }
            fs::write(path, content)
                .with_cli_context(|| format!("Failed to write '{}'", path.display()))?;
            output.success(&format!("Created {}", path.display()))?;
        }
        output.print("")?;
        output.print("Try it:")?;
        output.print("  kiln generate note --set title=\"Hello world\"")?;
    }

    Ok(())
}
