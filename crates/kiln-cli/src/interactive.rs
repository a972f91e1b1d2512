//! Terminal prompts and conflict decisions.
//!
//! Only compiled with the `interactive` feature.  Used when stdin is a
//! terminal and `--yes` was not given.

use dialoguer::{Confirm, Input, Select, theme::ColorfulTheme};
use tracing::debug;

use kiln_core::{
    application::ports::DecisionProvider,
    domain::{AnswerValue, Answers, ConflictResolution, Plan, Prompt},
    error::{KilnError, KilnResult},
};

use crate::error::{CliError, CliResult};

/// Ask every prompt that `answers` does not already cover.
pub fn ask_missing(prompts: &[Prompt], answers: &mut Answers) -> CliResult<()> {
    let theme = ColorfulTheme::default();
    for prompt in answers.missing(prompts) {
        let value = ask(&theme, prompt).map_err(prompt_error)?;
        debug!(prompt = prompt.name(), "Prompt answered");
        answers.insert(prompt.name(), value);
    }
    Ok(())
}

fn ask(theme: &ColorfulTheme, prompt: &Prompt) -> Result<AnswerValue, dialoguer::Error> {
    match prompt {
        Prompt::Text(p) => {
            let mut input = Input::<String>::with_theme(theme)
                .with_prompt(&p.message)
                .allow_empty(!p.required);
            if let Some(default) = p.default_value.as_ref().or(p.placeholder.as_ref()) {
                input = input.default(default.clone());
            }
            if let Some(initial) = &p.initial_value {
                input = input.with_initial_text(initial.clone());
            }
            input.interact_text().map(AnswerValue::Text)
        }
        Prompt::Confirm(p) => Confirm::with_theme(theme)
            .with_prompt(&p.message)
            .default(p.initial_value)
            .interact()
            .map(AnswerValue::Flag),
        Prompt::Select(p) => {
            let enabled: Vec<_> = p.options.iter().filter(|o| !o.disabled).collect();
            let labels: Vec<String> = enabled
                .iter()
                .map(|o| match &o.hint {
                    Some(hint) => format!("{} ({hint})", o.display_label()),
                    None => o.display_label().to_string(),
                })
                .collect();
            let initial = p
                .initial_value
                .as_ref()
                .and_then(|v| enabled.iter().position(|o| &o.value == v))
                .unwrap_or(0);

            let mut select = Select::with_theme(theme)
                .with_prompt(&p.message)
                .items(&labels)
                .default(initial);
            if let Some(max) = p.max_items {
                select = select.max_length(max);
            }
            let index = select.interact()?;
            Ok(AnswerValue::Text(enabled[index].value.clone()))
        }
    }
}

fn prompt_error(e: dialoguer::Error) -> CliError {
    CliError::InvalidInput {
        message: format!("prompt failed: {e}"),
        source: Some(Box::new(e)),
    }
}

/// Asks the user about each pending conflict, showing its diff.
#[derive(Debug, Default)]
pub struct TerminalDecisions {
    show_diff: bool,
}

impl TerminalDecisions {
    pub fn new(show_diff: bool) -> Self {
        Self { show_diff }
    }
}

const CHOICES: [(&str, ConflictResolution); 3] = [
    ("overwrite", ConflictResolution::Overwrite),
    ("skip (keep existing)", ConflictResolution::Skip),
    ("abort the run", ConflictResolution::Abort),
];

impl DecisionProvider for TerminalDecisions {
    fn resolve_conflict(&self, plan: &Plan) -> KilnResult<Option<ConflictResolution>> {
        let path = plan.artifact.destination_path().display().to_string();
        if self.show_diff {
            if let Some(diff) = &plan.conflict.diff {
                eprintln!("{diff}");
            }
        }

        let labels: Vec<&str> = CHOICES.iter().map(|(label, _)| *label).collect();
        let index = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("{path} differs from what would be written"))
            .items(&labels)
            .default(0)
            .interact()
            .map_err(|e| KilnError::Internal {
                message: format!("conflict prompt failed: {e}"),
            })?;
        Ok(Some(CHOICES[index].1))
    }

    fn confirm_run(&self, plans: &[Plan]) -> KilnResult<bool> {
        Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Apply {} plan(s)?", plans.len()))
            .default(true)
            .interact()
            .map_err(|e| KilnError::Internal {
                message: format!("confirmation prompt failed: {e}"),
            })
    }
}
