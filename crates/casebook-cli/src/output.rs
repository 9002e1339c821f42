//! Output formatting shared by every `cb` subcommand.
//!
//! A command builds one serializable view and hands it to [`render_mode`]
//! together with a text and a pretty renderer; JSON comes from serde.
//!
//! The mode is picked in this order:
//! 1. `--format`, or the hidden `--json` shorthand
//! 2. `CASEBOOK_FORMAT` (`pretty`, `text` or `json`, any case)
//! 3. `pretty` when stdout is a terminal, `text` otherwise
//!
//! Errors follow the same mode and always go to stderr.

use std::io::{self, IsTerminal, Write};

use casebook_core::error::ErrorCode;
use clap::ValueEnum;
use serde::Serialize;

/// Column width of pretty separators.
pub const RULE_WIDTH: usize = 72;

pub fn pretty_rule(w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "{}", "-".repeat(RULE_WIDTH))
}

/// Heading line plus separator.
pub fn pretty_section(w: &mut dyn Write, heading: &str) -> io::Result<()> {
    writeln!(w, "{heading}")?;
    pretty_rule(w)
}

/// `label:` padded to a fixed column, then the value.
pub fn pretty_kv(w: &mut dyn Write, label: &str, value: impl AsRef<str>) -> io::Result<()> {
    let label = format!("{label}:");
    writeln!(w, "{label:<12} {}", value.as_ref())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Sections and aligned columns for a terminal.
    Pretty,
    /// One record per line for pipes.
    Text,
    /// Stable JSON.
    Json,
}

impl OutputMode {
    fn from_env_value(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pretty" => Some(Self::Pretty),
            "text" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

fn pick_output_mode(
    flag: Option<OutputMode>,
    json_shorthand: bool,
    env_value: Option<&str>,
    stdout_is_tty: bool,
) -> OutputMode {
    if let Some(mode) = flag {
        return mode;
    }
    if json_shorthand {
        return OutputMode::Json;
    }
    env_value
        .and_then(OutputMode::from_env_value)
        .unwrap_or(if stdout_is_tty {
            OutputMode::Pretty
        } else {
            OutputMode::Text
        })
}

/// Output mode for this invocation.
pub fn resolve_output_mode(flag: Option<OutputMode>, json_shorthand: bool) -> OutputMode {
    let env_value = std::env::var("CASEBOOK_FORMAT").ok();
    pick_output_mode(
        flag,
        json_shorthand,
        env_value.as_deref(),
        io::stdout().is_terminal(),
    )
}

/// Write `value` to `w` in `mode`.
pub fn write_mode<T: Serialize>(
    mode: OutputMode,
    value: &T,
    w: &mut dyn Write,
    text: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
    pretty: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    match mode {
        OutputMode::Pretty => pretty(value, w)?,
        OutputMode::Text => text(value, w)?,
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut *w, value)?;
            writeln!(w)?;
        }
    }
    Ok(())
}

/// [`write_mode`] on locked stdout.
pub fn render_mode<T: Serialize>(
    mode: OutputMode,
    value: &T,
    text: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
    pretty: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    let mut out = io::stdout().lock();
    write_mode(mode, value, &mut out, text, pretty)
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// User-facing form of an [`ErrorCode`].
#[derive(Debug, Serialize)]
pub struct CliError {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<&'static str>,
    /// `E####`.
    pub code: &'static str,
    /// Snake-case name, e.g. `corpus_not_found`.
    pub error_code: &'static str,
}

impl CliError {
    /// Describe `code`, appending `detail` to its message when non-empty.
    pub fn from_code(code: ErrorCode, detail: impl AsRef<str>) -> Self {
        let detail = detail.as_ref();
        let message = if detail.is_empty() {
            code.message().to_string()
        } else {
            format!("{}: {detail}", code.message())
        };
        Self {
            message,
            suggestion: code.hint(),
            code: code.code(),
            error_code: code.slug(),
        }
    }
}

/// JSON errors are wrapped as `{"error": {...}}`; other modes print
/// `error[E####]: message` and an optional suggestion line.
pub fn write_error(mode: OutputMode, error: &CliError, w: &mut dyn Write) -> anyhow::Result<()> {
    if mode == OutputMode::Json {
        serde_json::to_writer_pretty(&mut *w, &serde_json::json!({ "error": error }))?;
        writeln!(w)?;
        return Ok(());
    }
    writeln!(w, "error[{}]: {}", error.code, error.message)?;
    if let Some(suggestion) = error.suggestion {
        writeln!(w, "  suggestion: {suggestion}")?;
    }
    Ok(())
}

/// Report `code` on stderr and return it as the process error.
pub fn fail(mode: OutputMode, code: ErrorCode, detail: impl AsRef<str>) -> anyhow::Error {
    let error = CliError::from_code(code, detail);
    if let Err(err) = write_error(mode, &error, &mut io::stderr().lock()) {
        tracing::warn!(%err, "could not write error report");
    }
    anyhow::anyhow!("{}: {}", error.code, error.message)
}
