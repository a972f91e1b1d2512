//! Implementation of the `kiln list` command.

use std::path::Path;

use kiln_core::application::{CatalogService, GeneratorInfo};

use crate::{
    cli::{ListArgs, ListFormat, OutputFormat},
    commands::Workspace,
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

pub fn execute(
    args: ListArgs,
    config: AppConfig,
    cwd: &Path,
    output: OutputManager,
) -> CliResult<()> {
    let workspace = Workspace::load(&config, cwd)?;
    let generators = CatalogService::new(workspace.catalog).list();

    // `--output-format json` implies the JSON listing.
    let format = if output.format() == OutputFormat::Json {
        ListFormat::Json
    } else {
        args.format
    };

    match format {
        ListFormat::Table => {
            if generators.is_empty() {
                output.warning(&format!(
                    "No generators found in {}",
                    workspace.engine.paths.generators.as_path().display()
                ))?;
                output.print("Run `kiln init --example` to create one.")?;
                return Ok(());
            }
            output.header("Available generators:")?;
            for line in table(&generators) {
                output.print(&line)?;
            }
        }
        ListFormat::Json => output.json(&generators)?,
        ListFormat::Plain => {
            for g in &generators {
                output.print(&g.name)?;
            }
        }
    }

    Ok(())
}

/// One aligned row per generator.
fn table(generators: &[GeneratorInfo]) -> Vec<String> {
    let width = generators.iter().map(|g| g.name.len()).max().unwrap_or(0);
    generators
        .iter()
        .map(|g| {
            let counts = format!("{} prompt(s), {} action(s)", g.prompts, g.actions);
            if g.description.is_empty() {
                format!("  {:<width$}  {counts}", g.name)
            } else {
                format!("  {:<width$}  {}  [{counts}]", g.name, g.description)
            }
        })
        .collect()
}
