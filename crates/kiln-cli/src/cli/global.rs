//! Flags shared by every subcommand.
//!
//! Flattened into [`super::Cli`] so `-v`, `-q`, `-C` and friends work in any
//! position on the command line.

use clap::Args;
use std::path::PathBuf;

/// Global arguments for all commands.
#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    /// Increase logging verbosity.
    ///
    /// Pass once for INFO (`-v`), twice for DEBUG (`-vv`), three times for
    /// TRACE (`-vvv`).  `-v` also prints conflict diffs after a run.
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "Increase verbosity (-v, -vv, -vvv)",
        long_help = "Increase logging verbosity:
    (none)  - Only warnings and errors
    -v      - Info level, plus conflict diffs in the run summary
    -vv     - Debug level (per artifact and per plan)
    -vvv    - Trace level"
    )]
    pub verbose: u8,

    /// Suppress all non-error output.
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        conflicts_with = "verbose",
        help = "Suppress non-error output"
    )]
    pub quiet: bool,

    /// Disable ANSI colour codes.
    ///
    /// Honoured automatically when `NO_COLOR` is set
    /// (see <https://no-color.org>).
    #[arg(
        long = "no-color",
        global = true,
        env = "NO_COLOR",
        help = "Disable colored output"
    )]
    pub no_color: bool,

    /// Configuration file path.
    #[arg(
        short = 'c',
        long = "config",
        global = true,
        value_name = "FILE",
        env = "KILN_CONFIG",
        help = "Configuration file path"
    )]
    pub config: Option<PathBuf>,

    /// Directory to run in instead of the current one.
    #[arg(
        short = 'C',
        long = "cwd",
        global = true,
        value_name = "DIR",
        help = "Run as if started in DIR"
    )]
    pub cwd: Option<PathBuf>,

    /// How results are rendered.
    #[arg(
        long = "output-format",
        global = true,
        value_enum,
        default_value = "auto",
        help = "Output format"
    )]
    pub output_format: OutputFormat,
}

/// How the CLI should render its output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human when stdout is a terminal, plain otherwise.
    #[default]
    Auto,
    /// Colours and glyphs.
    Human,
    /// No ANSI codes.
    Plain,
    /// Machine-readable JSON on stdout.
    Json,
}
