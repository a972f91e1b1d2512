//! # Kiln CLI
//!
//! Generator-driven file scaffolding.
//!
//! ## Startup sequence
//!
//! 1. Parse CLI arguments (clap handles `--help` / `--version` early-exit).
//! 2. Resolve the working directory and load configuration.
//! 3. Initialise the tracing subscriber.
//! 4. Build the [`OutputManager`].
//! 5. Dispatch to the appropriate command handler.
//! 6. Translate any [`CliError`] into a user-facing message and exit code.
//!
//! ## Exit codes
//!
//! | Code | Meaning                              |
//! |------|--------------------------------------|
//! |  0   | Success                              |
//! |  1   | Internal / system error              |
//! |  2   | User / input error                   |
//! |  3   | Resource not found                   |
//! |  4   | Configuration error                  |
//! |  5   | Run halted (conflict, failure, stop) |

use std::io::IsTerminal as _;
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, info, instrument};

use crate::{
    cli::{Cli, Commands},
    config::AppConfig,
    error::{CliError, CliResult},
    logging::init_logging,
    output::OutputManager,
};

mod cli;
mod commands;
mod config;
mod error;
#[cfg(feature = "interactive")]
mod interactive;
mod logging;
mod output;

fn main() -> ExitCode {
    // `.env` may carry KILN_* overrides; a missing file is fine.
    let _ = dotenvy::dotenv();

    // ── 1. Parse arguments ────────────────────────────────────────────────
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version arrive here too and must exit 0.
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(2)
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    let verbose = cli.global.verbose > 0;

    // ── 2. Working directory and configuration ────────────────────────────
    let loaded = commands::working_dir(cli.global.cwd.as_deref()).and_then(|cwd| {
        AppConfig::load(cli.global.config.as_deref(), &cwd).map(|config| (cwd, config))
    });
    let (cwd, config) = match loaded {
        Ok(loaded) => loaded,
        Err(e) => return handle_error(e, verbose),
    };

    // ── 3. Initialise tracing ─────────────────────────────────────────────
    if let Err(e) = init_logging(&cli.global, config.behavior.verbose) {
        eprintln!("Failed to initialise logging: {e}");
        return ExitCode::from(1);
    }

    debug!(
        verbose = cli.global.verbose,
        quiet = cli.global.quiet,
        cwd = %cwd.display(),
        config_files = config.sources.len(),
        "CLI started"
    );

    // ── 4. Build output manager ───────────────────────────────────────────
    let output = OutputManager::new(&cli.global, &config);

    // ── 5. Dispatch + 6. Error handling ──────────────────────────────────
    match run(cli, config, &cwd, output) {
        Ok(()) => {
            info!("Kiln completed successfully");
            ExitCode::SUCCESS
        }
        Err(e) => handle_error(e, verbose),
    }
}

/// Dispatch to the correct command handler.
#[instrument(skip_all)]
fn run(cli: Cli, config: AppConfig, cwd: &Path, output: OutputManager) -> CliResult<()> {
    match cli.command {
        Commands::Generate(cmd) => commands::generate::execute(cmd, cli.global, config, cwd, output),
        Commands::List(cmd) => commands::list::execute(cmd, config, cwd, output),
        Commands::Show(cmd) => commands::show::execute(cmd, config, cwd, output),
        Commands::Init(cmd) => commands::init::execute(cmd, config, cwd, output),
        Commands::Completions(cmd) => commands::completions::execute(cmd),
        Commands::Config(cmd) => commands::config::execute(cmd, config, output),
    }
}

/// Translate a `CliError` into a user message and an exit code.
fn handle_error(err: CliError, verbose: bool) -> ExitCode {
    err.log();

    let msg = if std::io::stderr().is_terminal() {
        err.format_colored(verbose)
    } else {
        err.format_plain(verbose)
    };
    eprint!("{msg}");

    ExitCode::from(err.exit_code())
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_structure_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn cli_version_matches_cargo() {
        let cmd = Cli::command();
        assert_eq!(cmd.get_version(), Some(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn cli_has_author() {
        let cmd = Cli::command();
        assert!(cmd.get_author().is_some());
    }
}
