//! Output management and formatting.

use std::io::{self, IsTerminal};

use console::Term;
use owo_colors::OwoColorize;
use serde::Serialize;

use kiln_core::domain::ResultStatus;

use crate::cli::global::{GlobalArgs, OutputFormat};
use crate::config::AppConfig;
use crate::error::{CliError, CliResult};

/// Manages CLI output based on configuration.
pub struct OutputManager {
    resolved_format: OutputFormat,
    quiet: bool,
    no_color: bool,
    term: Term,
}

impl OutputManager {
    /// Build an `OutputManager` from parsed CLI flags and loaded config.
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        let resolved_format = if args.output_format == OutputFormat::Auto {
            if io::stdout().is_terminal() {
                OutputFormat::Human
            } else {
                OutputFormat::Plain
            }
        } else {
            args.output_format
        };

        Self {
            resolved_format,
            quiet: args.quiet,
            no_color: args.no_color
                || config.output.no_color
                || resolved_format != OutputFormat::Human,
            term: Term::stdout(),
        }
    }

    // ── Public write methods ───────────────────────────────────────────────

    /// Generic message; suppressed in quiet mode.
    pub fn print(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.term.write_line(msg)
    }

    /// Success indicator: `✓ <msg>`.
    pub fn success(&self, msg: &str) -> io::Result<()> {
        self.glyph_line("\u{2713}", msg, Tone::Green)
    }

    /// Error indicator: `✗ <msg>`.  Never suppressed.
    pub fn error(&self, msg: &str) -> io::Result<()> {
        let line = if self.no_color {
            format!("\u{2717} {msg}")
        } else {
            format!("{} {}", "\u{2717}".red().bold(), msg.red())
        };
        self.term.write_line(&line)
    }

    /// Warning indicator: `⚠ <msg>`.
    pub fn warning(&self, msg: &str) -> io::Result<()> {
        self.glyph_line("\u{26a0}", msg, Tone::Yellow)
    }

    /// Informational indicator: `ℹ <msg>`.
    pub fn info(&self, msg: &str) -> io::Result<()> {
        self.glyph_line("\u{2139}", msg, Tone::Blue)
    }

    /// Bold cyan header line.
    pub fn header(&self, text: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            text.to_owned()
        } else {
            text.cyan().bold().to_string()
        };
        self.term.write_line(&line)
    }

    /// One line per applied plan, glyph chosen by status.
    ///
    /// Failures are printed even in quiet mode.
    pub fn status(&self, status: ResultStatus, msg: &str) -> io::Result<()> {
        match status {
            ResultStatus::Succeed => self.success(msg),
            ResultStatus::Skipped => self.glyph_line("\u{21b7}", msg, Tone::Yellow), // ↷
            ResultStatus::Failed => self.error(msg),
        }
    }

    /// A unified diff, indented, `+`/`-` lines coloured.
    pub fn diff(&self, diff: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        for line in diff.lines() {
            let styled = match line.chars().next() {
                _ if self.no_color => line.to_string(),
                Some('+') => line.green().to_string(),
                Some('-') => line.red().to_string(),
                Some('@') => line.cyan().to_string(),
                _ => line.dimmed().to_string(),
            };
            self.term.write_line(&format!("    {styled}"))?;
        }
        Ok(())
    }

    /// Pretty JSON on stdout.  Written even in quiet mode, since it was
    /// asked for explicitly.
    pub fn json<T: Serialize>(&self, value: &T) -> CliResult<()> {
        let rendered = serde_json::to_string_pretty(value).map_err(|e| CliError::InvalidInput {
            message: format!("cannot serialise output: {e}"),
            source: Some(Box::new(e)),
        })?;
        self.term.write_line(&rendered)?;
        Ok(())
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// `true` if ANSI colours are enabled.
    pub fn supports_color(&self) -> bool {
        !self.no_color
    }

    /// `true` if quiet mode suppresses most output.
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// The resolved (non-Auto) output format.
    pub fn format(&self) -> OutputFormat {
        self.resolved_format
    }

    fn glyph_line(&self, glyph: &str, msg: &str, tone: Tone) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("{glyph} {msg}")
        } else {
            match tone {
                Tone::Green => format!("{} {}", glyph.green().bold(), msg.green()),
                Tone::Yellow => format!("{} {}", glyph.yellow().bold(), msg.yellow()),
                Tone::Blue => format!("{} {}", glyph.blue().bold(), msg.blue()),
            }
        };
        self.term.write_line(&line)
    }
}

#[derive(Clone, Copy)]
enum Tone {
    Green,
    Yellow,
    Blue,
}

// ── tests ─────────────────────────────────────────────────────────────────────
