//! `cb capabilities`: which ranking signals are active.

use std::io::Write;

use casebook_core::capabilities::{CapabilityStatus, describe_capabilities, detect_capabilities};
use casebook_core::config::ProjectConfig;

use crate::output::{OutputMode, pretty_section, render_mode};

/// Execute `cb capabilities`.
///
/// # Errors
///
/// Returns an error if output rendering fails.
pub fn run_capabilities(config: &ProjectConfig, output: OutputMode) -> anyhow::Result<()> {
    let statuses = describe_capabilities(&detect_capabilities(&config.search));
    render_mode(
        output,
        &statuses,
        |s, w| render_capabilities_text(s, w),
        |s, w| render_capabilities_pretty(s, w),
    )
}

fn render_capabilities_pretty(
    statuses: &[CapabilityStatus],
    w: &mut dyn Write,
) -> std::io::Result<()> {
    pretty_section(w, "Ranking signals")?;
    for status in statuses {
        let mark = if status.available { "✓" } else { "✗" };
        writeln!(w, "{mark} {:<8} {}", status.name, status.fallback)?;
    }
    Ok(())
}

fn render_capabilities_text(
    statuses: &[CapabilityStatus],
    w: &mut dyn Write,
) -> std::io::Result<()> {
    for status in statuses {
        writeln!(w, "{}  {}", status.name, status.available)?;
    }
    Ok(())
}
