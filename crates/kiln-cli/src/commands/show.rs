//! Implementation of the `kiln show` command.

use std::path::Path;

use serde_json::json;

use kiln_core::{
    application::CatalogService,
    domain::{GeneratorResource, Prompt},
};

use crate::{
    cli::{OutputFormat, ShowArgs},
    commands::Workspace,
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

pub fn execute(
    args: ShowArgs,
    config: AppConfig,
    cwd: &Path,
    output: OutputManager,
) -> CliResult<()> {
    let workspace = Workspace::load(&config, cwd)?;
    let service = CatalogService::new(workspace.catalog);
    let generator = service.get(&args.generator)?;

    if output.format() == OutputFormat::Json {
        return output.json(&json!({
            "name": generator.name,
            "description": generator.description,
            "origin": generator.meta.origin,
            "source_path": generator.meta.source_path,
            "prompts": generator.prompts,
            "actions": generator.actions,
        }));
    }

    for line in describe(generator) {
        output.print(&line)?;
    }
    Ok(())
}

fn describe(generator: &GeneratorResource) -> Vec<String> {
    let mut lines = vec![generator.name.to_string()];
    if !generator.description.is_empty() {
        lines.push(format!("  {}", generator.description));
    }
    if let Some(path) = &generator.meta.source_path {
        lines.push(format!("  defined in {}", path.display()));
    }

    if !generator.prompts.is_empty() {
        lines.push(String::new());
        lines.push("Prompts:".into());
        lines.extend(generator.prompts.iter().map(describe_prompt));
    }

    lines.push(String::new());
    lines.push("Actions:".into());
    for (i, action) in generator.actions.iter().enumerate() {
        lines.push(format!("  {}. {} {}", i + 1, action.kind, action.destination));
    }
    lines
}

fn describe_prompt(prompt: &Prompt) -> String {
    let detail = match prompt {
        Prompt::Text(p) => match (&p.default_value, p.required) {
            (Some(default), _) => format!("default '{default}'"),
            (None, true) => "required".into(),
            (None, false) => "optional".into(),
        },
        Prompt::Confirm(p) => format!("default {}", p.initial_value),
        Prompt::Select(p) => {
            let values: Vec<&str> = p
                .options
                .iter()
                .filter(|o| !o.disabled)
                .map(|o| o.value.as_str())
                .collect();
            values.join(" | ")
        }
    };
    format!(
        "  {} ({}): {} [{detail}]",
        prompt.name(),
        prompt.kind(),
        prompt.message()
    )
}
