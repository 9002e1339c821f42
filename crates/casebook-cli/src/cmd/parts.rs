//! `cb parts`: classify replacement parts by risk tier.

use std::io::Write;

use casebook_core::config::ProjectConfig;
use casebook_core::parts::{PartRuleTable, canonical_interval};
use casebook_core::schedule::ClassifiedPart;
use clap::Args;
use serde::Serialize;

use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

#[derive(Args, Debug)]
#[command(
    about = "Classify parts by risk tier",
    long_about = "Classify part descriptions as red (critical), green (routine) or normal \
                  for an equipment model and maintenance interval.",
    after_help = "EXAMPLES:\n    # One part\n    cb parts B2476 --model 420單向軸承 --interval 500K保養\n\n\
                  # Several parts at once\n    cb parts B2476 D120 --model 420單向軸承 --interval 1M"
)]
pub struct PartsArgs {
    /// Part descriptions or codes.
    #[arg(required = true)]
    pub parts: Vec<String>,

    /// Equipment model.
    #[arg(long)]
    pub model: String,

    /// Maintenance interval label, e.g. `500K保養` or `1M`.
    #[arg(long)]
    pub interval: String,
}

#[derive(Debug, Serialize)]
pub struct PartsOutput {
    pub model: String,
    pub interval: String,
    /// Canonical lookup bucket derived from `interval`.
    pub bucket: String,
    /// Whether a rule exists for `(model, bucket)`.
    pub rule_found: bool,
    pub parts: Vec<ClassifiedPart>,
}

/// Execute `cb parts`.
///
/// # Errors
///
/// Returns an error if output rendering fails.
pub fn run_parts(args: &PartsArgs, config: &ProjectConfig, output: OutputMode) -> anyhow::Result<()> {
    let table = PartRuleTable::from_config(&config.part_rules);
    let parts_output = classify(args, &table);
    if !parts_output.rule_found {
        tracing::debug!(
            model = %args.model,
            bucket = %parts_output.bucket,
            "no part rule for bucket, every part is normal"
        );
    }

    render_mode(
        output,
        &parts_output,
        |out, w| render_parts_text(out, w),
        |out, w| render_parts_pretty(out, w),
    )
}

fn classify(args: &PartsArgs, table: &PartRuleTable) -> PartsOutput {
    let parts = args
        .parts
        .iter()
        .map(|part| {
            let (tier, icon) = table.classify(part, &args.model, &args.interval);
            ClassifiedPart {
                part: part.clone(),
                tier,
                icon,
            }
        })
        .collect();

    PartsOutput {
        model: args.model.clone(),
        interval: args.interval.clone(),
        bucket: canonical_interval(&args.interval),
        rule_found: table.rule(&args.model, &args.interval).is_some(),
        parts,
    }
}

fn render_parts_pretty(out: &PartsOutput, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, &format!("{} · {}", out.model, out.bucket))?;
    for part in &out.parts {
        writeln!(w, "{} {}", part.icon, part.part)?;
    }
    if !out.rule_found {
        pretty_kv(w, "Note", "no rule for this model and interval")?;
    }
    Ok(())
}

fn render_parts_text(out: &PartsOutput, w: &mut dyn Write) -> std::io::Result<()> {
    for part in &out.parts {
        writeln!(w, "{}  {}", part.tier.as_str(), part.part)?;
    }
    Ok(())
}
