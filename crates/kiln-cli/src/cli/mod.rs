//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use clap::{Args, Parser, Subcommand, ValueEnum};

use kiln_core::domain::{ConflictResolution, ErrorResolution};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "kiln",
    bin_name = "kiln",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Generator-driven file scaffolding",
    long_about = "Kiln renders the actions of a generator into files, plans every \
                  write against what is already on disk, and applies the plan \
                  with conflict and error strategies you choose.",
    after_help = "EXAMPLES:\n\
        \x20 kiln init\n\
        \x20 kiln list\n\
        \x20 kiln generate component --set name=Button\n\
        \x20 kiln generate component --set name=Button --dry-run --conflict overwrite\n\
        \x20 kiln completions bash > /usr/share/bash-completion/completions/kiln",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run a generator.
    #[command(
        visible_alias = "g",
        about = "Run a generator",
        after_help = "EXAMPLES:\n\
            \x20 kiln generate component --set name=Button\n\
            \x20 kiln g note --set title=\"Release notes\" --yes\n\
            \x20 kiln generate component --set name=Button --dry-run -v"
    )]
    Generate(GenerateArgs),

    /// List available generators.
    #[command(
        visible_alias = "ls",
        about = "List available generators",
        after_help = "EXAMPLES:\n\
            \x20 kiln list\n\
            \x20 kiln list --format json"
    )]
    List(ListArgs),

    /// Describe one generator.
    #[command(
        about = "Show a generator's prompts and actions",
        after_help = "EXAMPLES:\n\
            \x20 kiln show component"
    )]
    Show(ShowArgs),

    /// Initialise a Kiln project in the current directory.
    #[command(
        about = "Initialise configuration and resource directories",
        after_help = "EXAMPLES:\n\
            \x20 kiln init            # kiln.toml + .kiln/\n\
            \x20 kiln init --example  # also add an example generator\n\
            \x20 kiln init --force    # overwrite an existing kiln.toml"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 kiln completions bash > ~/.local/share/bash-completion/completions/kiln\n\
            \x20 kiln completions zsh  > ~/.zfunc/_kiln\n\
            \x20 kiln completions fish > ~/.config/fish/completions/kiln.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the effective configuration.
    #[command(
        about = "Configuration inspection",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 kiln config get strategy.conflict_resolution\n\
            \x20 kiln config list\n\
            \x20 kiln config path"
    )]
    Config(ConfigCommands),
}

// ── generate ──────────────────────────────────────────────────────────────────

/// Arguments for `kiln generate`.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Name of the generator to run.
    #[arg(value_name = "GENERATOR", help = "Generator name")]
    pub generator: String,

    /// Pre-answer a prompt.  Repeatable.
    #[arg(
        short = 's',
        long = "set",
        value_name = "KEY=VALUE",
        value_parser = parse_answer,
        help = "Answer a prompt (repeatable)"
    )]
    pub set: Vec<(String, String)>,

    /// Compute everything, write nothing.
    #[arg(short = 'n', long = "dry-run", help = "Show what would happen")]
    pub dry_run: bool,

    /// Conflict strategy for this run.
    #[arg(
        long = "conflict",
        value_name = "STRATEGY",
        value_enum,
        help = "How to treat existing files with different content"
    )]
    pub conflict: Option<ConflictArg>,

    /// Error strategy for this run.
    #[arg(
        long = "on-error",
        value_name = "STRATEGY",
        value_enum,
        help = "Whether a failing action stops the run"
    )]
    pub on_error: Option<ErrorArg>,

    /// Skip all prompts and confirmations.
    #[arg(short = 'y', long = "yes", help = "Do not prompt; use defaults")]
    pub yes: bool,

    /// Bypass the render cache.
    #[arg(long = "no-cache", help = "Do not read or write the render cache")]
    pub no_cache: bool,
}

/// Parse `key=value`.  The value may itself contain `=`.
fn parse_answer(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in '{raw}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConflictArg {
    /// Stop at the first conflict.
    Abort,
    /// Decide per conflict.
    Ask,
    /// Replace existing content.
    Overwrite,
    /// Keep existing content.
    Skip,
}

impl From<ConflictArg> for ConflictResolution {
    fn from(arg: ConflictArg) -> Self {
        match arg {
            ConflictArg::Abort => Self::Abort,
            ConflictArg::Ask => Self::Ask,
            ConflictArg::Overwrite => Self::Overwrite,
            ConflictArg::Skip => Self::Skip,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ErrorArg {
    /// Stop at the first failing action.
    Abort,
    /// Record the failure and continue.
    Skip,
}

impl From<ErrorArg> for ErrorResolution {
    fn from(arg: ErrorArg) -> Self {
        match arg {
            ErrorArg::Abort => Self::Abort,
            ErrorArg::Skip => Self::Skip,
        }
    }
}

// ── list ──────────────────────────────────────────────────────────────────────

/// Arguments for `kiln list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Output format for the listing.
    #[arg(
        short = 'f',
        long = "format",
        value_enum,
        default_value = "table",
        help = "Listing format"
    )]
    pub format: ListFormat,
}

/// How `kiln list` prints generators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// Aligned columns with descriptions.
    Table,
    /// JSON array.
    Json,
    /// One name per line.
    Plain,
}

// ── show ──────────────────────────────────────────────────────────────────────

/// Arguments for `kiln show`.
#[derive(Debug, Args)]
pub struct ShowArgs {
    #[arg(value_name = "GENERATOR", help = "Generator name")]
    pub generator: String,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `kiln init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Overwrite an existing `kiln.toml`.
    #[arg(long = "force", help = "Overwrite existing configuration")]
    pub force: bool,

    /// Also write an example generator and its template.
    #[arg(long = "example", help = "Add an example generator")]
    pub example: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `kiln completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    #[arg(value_enum, help = "Target shell")]
    pub shell: Shell,
}

/// Supported shells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    #[value(name = "powershell")]
    PowerShell,
    Elvish,
}

// ── config ────────────────────────────────────────────────────────────────────

/// `kiln config` subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print one value, by dotted key.
    Get {
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Print the effective configuration as TOML.
    List,
    /// Print the path of the configuration file in use.
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_answer_splits_on_first_equals() {
        assert_eq!(
            parse_answer("name=Button").unwrap(),
            ("name".to_string(), "Button".to_string())
        );
        assert_eq!(
            parse_answer("expr=a=b").unwrap(),
            ("expr".to_string(), "a=b".to_string())
        );
        assert_eq!(parse_answer("empty=").unwrap().1, "");
    }

    #[test]
    fn parse_answer_rejects_malformed() {
        assert!(parse_answer("novalue").is_err());
        assert!(parse_answer("=x").is_err());
    }

    #[test]
    fn generate_args_parse() {
        let cli = Cli::try_parse_from([
            "kiln",
            "generate",
            "component",
            "--set",
            "name=Button",
            "-s",
            "tests=true",
            "--conflict",
            "overwrite",
            "--on-error",
            "skip",
            "--dry-run",
        ])
        .unwrap();

        let Commands::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.generator, "component");
        assert_eq!(args.set.len(), 2);
        assert_eq!(args.conflict, Some(ConflictArg::Overwrite));
        assert_eq!(args.on_error, Some(ErrorArg::Skip));
        assert!(args.dry_run);
        assert!(!args.yes);
    }

    #[test]
    fn strategy_args_map_to_core() {
        assert_eq!(
            ConflictResolution::from(ConflictArg::Skip),
            ConflictResolution::Skip
        );
        assert_eq!(ErrorResolution::from(ErrorArg::Abort), ErrorResolution::Abort);
    }
}
