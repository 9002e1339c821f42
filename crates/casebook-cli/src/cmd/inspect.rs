//! `cb inspect`: read the inspection checklist for a machine part.

use std::io::Write;
use std::path::{Path, PathBuf};

use casebook_core::error::ErrorCode;
use casebook_core::inspection::InspectionChecklist;
use clap::Args;
use serde::Serialize;

use super::load_inspection_arg;
use crate::output::{OutputMode, fail, pretty_section, render_mode};

#[derive(Args, Debug)]
#[command(
    about = "Show the inspection checklist",
    long_about = "List the inspected machine parts, or the individual checks for one part.",
    after_help = "EXAMPLES:\n    # List inspection items\n    cb inspect\n\n\
                  # Checks for the spindle\n    cb inspect --item 主軸"
)]
pub struct InspectArgs {
    /// Checklist export (JSON array of rows). Defaults to `.casebook/inspection.json`.
    #[arg(long, value_name = "PATH")]
    pub inspection: Option<PathBuf>,

    /// Inspection item as it appears in the sheet.
    #[arg(long)]
    pub item: Option<String>,
}

#[derive(Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum InspectView {
    Items { items: Vec<String> },
    Details { item: String, lines: Vec<String> },
}

/// Execute `cb inspect`.
///
/// # Errors
///
/// Returns an error if the checklist cannot be loaded, the item is not in
/// it, or output rendering fails.
pub fn run_inspect(
    args: &InspectArgs,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let checklist = load_inspection_arg(project_root, args.inspection.as_deref(), output)?;
    let view = build_view(&checklist, args.item.as_deref())
        .map_err(|(code, detail)| fail(output, code, detail))?;

    render_mode(
        output,
        &view,
        |v, w| render_inspect_text(v, w),
        |v, w| render_inspect_pretty(v, w),
    )
}

fn build_view(
    checklist: &InspectionChecklist,
    item: Option<&str>,
) -> Result<InspectView, (ErrorCode, String)> {
    let owned = |lines: Vec<&str>| lines.into_iter().map(str::to_string).collect::<Vec<_>>();

    let Some(item) = item.map(str::trim) else {
        return Ok(InspectView::Items {
            items: owned(checklist.items()),
        });
    };
    if !checklist.contains_item(item) {
        return Err((ErrorCode::UnknownInspectionItem, item.to_string()));
    }
    Ok(InspectView::Details {
        item: item.to_string(),
        lines: owned(checklist.detail_lines(item)),
    })
}

fn render_inspect_pretty(view: &InspectView, w: &mut dyn Write) -> std::io::Result<()> {
    match view {
        InspectView::Items { items } => {
            pretty_section(w, "Inspection items")?;
            for item in items {
                writeln!(w, "  {item}")?;
            }
        }
        InspectView::Details { item, lines } => {
            pretty_section(w, &format!("📋 {item} checks"))?;
            if lines.is_empty() {
                writeln!(w, "  (no checks recorded)")?;
            }
            for line in lines {
                writeln!(w, "🔍 {line}")?;
            }
        }
    }
    Ok(())
}

fn render_inspect_text(view: &InspectView, w: &mut dyn Write) -> std::io::Result<()> {
    let lines = match view {
        InspectView::Items { items } => items,
        InspectView::Details { lines, .. } => lines,
    };
    for line in lines {
        writeln!(w, "{line}")?;
    }
    Ok(())
}
