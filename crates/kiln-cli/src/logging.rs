//! Tracing subscriber initialisation.
//!
//! Only the binary installs a subscriber; `kiln-core` and `kiln-adapters`
//! only emit spans and events.
//!
//! # Verbosity mapping
//!
//! | Flag(s)  | Filter level |
//! |----------|--------------|
//! | (none)   | WARN, or INFO with `behavior.verbose` |
//! | `-v`     | INFO         |
//! | `-vv`    | DEBUG        |
//! | `-vvv`   | TRACE        |
//! | `--quiet`| ERROR        |
//!
//! `RUST_LOG` overrides all of the above if set.

use std::io::IsTerminal as _;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::GlobalArgs;

/// Initialise the global tracing subscriber.
///
/// `config_verbose` is the `behavior.verbose` setting; it only matters when
/// no `-v` flag was given.
pub fn init_logging(args: &GlobalArgs, config_verbose: bool) -> anyhow::Result<()> {
    let level = derive_level(args, config_verbose);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "kiln={level},kiln_cli={level},kiln_core={level},kiln_adapters={level}"
        ))
    });

    let use_ansi = !args.no_color && std::io::stderr().is_terminal();

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_ansi(use_ansi)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialise tracing: {e}"))?;

    Ok(())
}

/// Translate the verbosity counter and quiet flag to a level string.
fn derive_level(args: &GlobalArgs, config_verbose: bool) -> &'static str {
    if args.quiet {
        return "error";
    }
    match args.verbose {
        0 if config_verbose => "info",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;

    fn args_with(verbose: u8, quiet: bool) -> GlobalArgs {
        GlobalArgs {
            verbose,
            quiet,
            no_color: true,
            config: None,
            cwd: None,
            output_format: OutputFormat::Auto,
        }
    }

    #[test]
    fn level_quiet() {
        assert_eq!(derive_level(&args_with(0, true), false), "error");
    }

    #[test]
    fn level_default() {
        assert_eq!(derive_level(&args_with(0, false), false), "warn");
    }

    #[test]
    fn config_verbose_raises_default_only() {
        assert_eq!(derive_level(&args_with(0, false), true), "info");
        assert_eq!(derive_level(&args_with(2, false), true), "debug");
        assert_eq!(derive_level(&args_with(0, true), true), "error");
    }

    #[test]
    fn level_counts() {
        assert_eq!(derive_level(&args_with(1, false), false), "info");
        assert_eq!(derive_level(&args_with(2, false), false), "debug");
        assert_eq!(derive_level(&args_with(3, false), false), "trace");
        assert_eq!(derive_level(&args_with(10, false), false), "trace");
    }

    #[test]
    fn quiet_overrides_verbose() {
        assert_eq!(derive_level(&args_with(3, true), false), "error");
    }
}
