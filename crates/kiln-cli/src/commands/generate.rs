//! Implementation of the `kiln generate` command.
//!
//! Responsibility: turn CLI arguments into a `GenerateRequest`, wire the
//! adapters, run the pipeline, and display the reports.

use std::io::IsTerminal as _;
use std::path::Path;

use serde_json::json;
use tracing::{debug, info, instrument};

use kiln_adapters::{LocalFilesystem, NonInteractive, SimpleRenderer, cache};
use kiln_core::{
    application::{
        ApplicationError, CatalogService, GenerateRequest, GenerateService, RunOutput,
        ports::DecisionProvider,
    },
    domain::{AnswerValue, Answers, Prompt, ResultStatus},
    error::KilnError,
};

use crate::{
    cli::{GenerateArgs, GlobalArgs, OutputFormat},
    commands::Workspace,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Execute `kiln generate`.
///
/// Dispatch sequence:
/// 1. Load configuration and catalog, apply flag overrides
/// 2. Check the generator exists
/// 3. Build answers from `--set`, then prompt for the rest when interactive
/// 4. Run the pipeline
/// 5. Print one line per report, or JSON
/// 6. A halted run becomes [`CliError::RunHalted`]
#[instrument(skip_all, fields(generator = %args.generator))]
pub fn execute(
    args: GenerateArgs,
    global: GlobalArgs,
    config: AppConfig,
    cwd: &Path,
    output: OutputManager,
) -> CliResult<()> {
    // 1. Configuration
    let Workspace {
        mut engine,
        catalog,
    } = Workspace::load(&config, cwd)?;
    if args.dry_run {
        engine.behavior.dry = true;
    }
    if let Some(conflict) = args.conflict {
        engine.strategy.conflict_resolution = conflict.into();
    }
    if let Some(on_error) = args.on_error {
        engine.strategy.error_resolution = on_error.into();
    }
    if args.no_cache {
        engine.cache.enabled = false;
    }

    // 2. Generator
    let catalog_service = CatalogService::new(catalog);
    let prompts = catalog_service.prompts(&args.generator)?.to_vec();

    // 3. Answers
    let mut answers = answers_from_flags(&prompts, &args.set)?;
    let interactive = !args.yes
        && !global.quiet
        && output.format() != OutputFormat::Json
        && std::io::stdin().is_terminal();
    if interactive {
        ask_missing(&prompts, &mut answers)?;
    }
    debug!(answers = answers.len(), interactive, "Answers collected");

    // 4. Run
    let cache = cache::for_strategy(
        engine.strategy.cache_resolution,
        engine.cache.ttl,
        engine.paths.cache.as_path(),
    );
    let service = GenerateService::new(
        engine,
        catalog_service.catalog().clone(),
        Box::new(SimpleRenderer::new()),
        Box::new(LocalFilesystem::new()),
        decision_provider(interactive, global.verbose > 0),
    )
    .with_cache(cache);

    let request = GenerateRequest::new(&args.generator, cwd)
        .with_answers(answers)
        .with_args(std::env::args().skip(1).collect());

    let run = match service.run(request) {
        Ok(run) => run,
        Err(KilnError::Application(ApplicationError::Cancelled)) => {
            return Err(CliError::Cancelled);
        }
        Err(e) => return Err(e.into()),
    };

    // 5. Display
    if output.format() == OutputFormat::Json {
        output.json(&run_json(&run))?;
    } else {
        print_summary(&run, global.verbose > 0, &output)?;
    }

    // 6. Exit status
    match run.halt {
        Some(cause) => Err(CliError::RunHalted {
            applied: run.results.len(),
            total: run.plans.len(),
            cause,
        }),
        None => {
            info!(reports = run.reports.len(), "Generate completed");
            Ok(())
        }
    }
}

// ── Answers ───────────────────────────────────────────────────────────────────

/// Answers from `--set key=value`, typed by the matching prompt.
///
/// Keys without a prompt are kept as text: hooks and templates may still
/// read them.
fn answers_from_flags(prompts: &[Prompt], pairs: &[(String, String)]) -> CliResult<Answers> {
    let mut answers = Answers::new();
    for (key, raw) in pairs {
        let prompt = prompts.iter().find(|p| p.name() == key);
        if prompt.is_none() {
            debug!(key = %key, "Answer has no matching prompt");
        }
        answers.insert(key.clone(), typed_answer(prompt, key, raw)?);
    }
    Ok(answers)
}

fn typed_answer(prompt: Option<&Prompt>, key: &str, raw: &str) -> CliResult<AnswerValue> {
    let invalid = |reason: String| CliError::InvalidAnswer {
        prompt: key.to_string(),
        reason,
    };

    match prompt {
        Some(Prompt::Confirm(_)) => parse_flag(raw)
            .map(AnswerValue::Flag)
            .ok_or_else(|| invalid(format!("expected true or false, got '{raw}'"))),
        Some(Prompt::Select(p)) => {
            if p.options.iter().any(|o| !o.disabled && o.value == raw) {
                Ok(AnswerValue::Text(raw.to_string()))
            } else {
                let allowed: Vec<&str> = p
                    .options
                    .iter()
                    .filter(|o| !o.disabled)
                    .map(|o| o.value.as_str())
                    .collect();
                Err(invalid(format!("expected one of: {}", allowed.join(", "))))
            }
        }
        Some(Prompt::Text(p)) if p.required && raw.is_empty() => {
            Err(invalid("a value is required".into()))
        }
        _ => Ok(AnswerValue::Text(raw.to_string())),
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" | "on" => Some(true),
        "false" | "no" | "n" | "0" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(feature = "interactive")]
fn ask_missing(prompts: &[Prompt], answers: &mut Answers) -> CliResult<()> {
    crate::interactive::ask_missing(prompts, answers)
}

#[cfg(not(feature = "interactive"))]
fn ask_missing(_prompts: &[Prompt], _answers: &mut Answers) -> CliResult<()> {
    Ok(())
}

#[cfg(feature = "interactive")]
fn decision_provider(interactive: bool, show_diff: bool) -> Box<dyn DecisionProvider> {
    if interactive {
        Box::new(crate::interactive::TerminalDecisions::new(show_diff))
    } else {
        Box::new(NonInteractive::new())
    }
}

#[cfg(not(feature = "interactive"))]
fn decision_provider(_interactive: bool, _show_diff: bool) -> Box<dyn DecisionProvider> {
    Box::new(NonInteractive::new())
}

// ── Display ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default, PartialEq, Eq)]
struct Tally {
    succeeded: usize,
    skipped: usize,
    failed: usize,
}

impl Tally {
    fn of(run: &RunOutput) -> Self {
        run.reports.iter().fold(Self::default(), |mut t, r| {
            match r.status {
                ResultStatus::Succeed => t.succeeded += 1,
                ResultStatus::Skipped => t.skipped += 1,
                ResultStatus::Failed => t.failed += 1,
            }
            t
        })
    }
}

fn print_summary(run: &RunOutput, verbose: bool, output: &OutputManager) -> CliResult<()> {
    if run.dry {
        output.info("Dry run: nothing was written")?;
    }

    for report in &run.reports {
        output.status(report.status, &report.status_message)?;
        if verbose && report.conflict.is_conflicted {
            if let Some(diff) = &report.conflict.diff {
                output.diff(diff)?;
            }
        }
    }

    let tally = Tally::of(run);
    let line = format!(
        "{} applied, {} skipped, {} failed",
        tally.succeeded, tally.skipped, tally.failed
    );
    if tally.failed > 0 || run.halt.is_some() {
        output.warning(&line)?;
    } else {
        output.success(&line)?;
    }
    Ok(())
}

fn run_json(run: &RunOutput) -> serde_json::Value {
    json!({
        "runtime_id": run.runtime_id,
        "dry": run.dry,
        "complete": run.is_complete(),
        "halt": run.halt.as_ref().map(ToString::to_string),
        "reports": run.reports,
    })
}
