//! `cb schedule`: browse the periodic maintenance schedule.
//!
//! Drill-down mirrors the maintenance sheet: intervals, then the models
//! serviced at an interval, then the classified replacement parts.

use std::io::Write;
use std::path::{Path, PathBuf};

use casebook_core::config::ProjectConfig;
use casebook_core::error::ErrorCode;
use casebook_core::parts::{PartRuleTable, PartTier};
use casebook_core::schedule::{ClassifiedPart, MaintenanceSchedule, normalize_interval_label};
use clap::Args;
use serde::Serialize;

use super::load_schedule_arg;
use crate::output::{OutputMode, fail, pretty_rule, pretty_section, render_mode};

#[derive(Args, Debug)]
#[command(
    about = "Browse the maintenance schedule",
    long_about = "List maintenance intervals, the models serviced at an interval, or the \
                  classified replacement parts for one interval and model.",
    after_help = "EXAMPLES:\n    # List intervals\n    cb schedule\n\n\
                  # Models serviced at 500K\n    cb schedule --interval 500K保養\n\n\
                  # Parts for one model\n    cb schedule --interval 500K保養 --model HGT-421"
)]
pub struct ScheduleArgs {
    /// Schedule export (JSON array of rows). Defaults to `.casebook/schedule.json`.
    #[arg(long, value_name = "PATH")]
    pub schedule: Option<PathBuf>,

    /// Interval label as it appears in the sheet.
    #[arg(long)]
    pub interval: Option<String>,

    /// Equipment model; requires `--interval`.
    #[arg(long, requires = "interval")]
    pub model: Option<String>,
}

#[derive(Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ScheduleView {
    Intervals {
        intervals: Vec<String>,
    },
    Models {
        interval: String,
        models: Vec<String>,
    },
    Parts {
        interval: String,
        model: String,
        red: usize,
        green: usize,
        parts: Vec<ClassifiedPart>,
    },
}

/// Execute `cb schedule`.
///
/// # Errors
///
/// Returns an error if the schedule cannot be loaded, the interval or model
/// is not in it, or output rendering fails.
pub fn run_schedule(
    args: &ScheduleArgs,
    config: &ProjectConfig,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let schedule = load_schedule_arg(project_root, args.schedule.as_deref(), output)?;
    let rules = PartRuleTable::from_config(&config.part_rules);
    let view = build_view(&schedule, &rules, args.interval.as_deref(), args.model.as_deref())
        .map_err(|(code, detail)| fail(output, code, detail))?;

    render_mode(
        output,
        &view,
        |v, w| render_schedule_text(v, w),
        |v, w| render_schedule_pretty(v, w),
    )
}

fn build_view(
    schedule: &MaintenanceSchedule,
    rules: &PartRuleTable,
    interval: Option<&str>,
    model: Option<&str>,
) -> Result<ScheduleView, (ErrorCode, String)> {
    let owned = |items: Vec<&str>| items.into_iter().map(str::to_string).collect::<Vec<_>>();

    let Some(interval) = interval else {
        return Ok(ScheduleView::Intervals {
            intervals: owned(schedule.intervals()),
        });
    };

    let models = schedule.models_for(interval);
    if models.is_empty() {
        return Err((ErrorCode::UnknownInterval, interval.to_string()));
    }
    let interval = normalize_interval_label(interval);

    let Some(model) = model else {
        return Ok(ScheduleView::Models {
            interval,
            models: owned(models),
        });
    };

    if !models.contains(&model) {
        return Err((ErrorCode::UnknownModel, model.to_string()));
    }

    let parts = schedule.classified_parts(&interval, model, rules);
    let count = |tier: PartTier| parts.iter().filter(|p| p.tier == tier).count();
    Ok(ScheduleView::Parts {
        red: count(PartTier::Red),
        green: count(PartTier::Green),
        interval,
        model: model.to_string(),
        parts,
    })
}

fn render_schedule_pretty(view: &ScheduleView, w: &mut dyn Write) -> std::io::Result<()> {
    match view {
        ScheduleView::Intervals { intervals } => {
            pretty_section(w, "Maintenance intervals")?;
            for interval in intervals {
                writeln!(w, "  {interval}")?;
            }
        }
        ScheduleView::Models { interval, models } => {
            pretty_section(w, &format!("Models serviced at {interval}"))?;
            for model in models {
                writeln!(w, "  {model}")?;
            }
        }
        ScheduleView::Parts {
            interval,
            model,
            red,
            green,
            parts,
        } => {
            pretty_section(w, &format!("{model} · {interval}"))?;
            for part in parts {
                writeln!(w, "{} {}", part.icon, part.part)?;
            }
            pretty_rule(w)?;
            writeln!(
                w,
                "{} {red} critical  {} {green} routine  {} {} other",
                PartTier::Red.icon(),
                PartTier::Green.icon(),
                PartTier::Normal.icon(),
                parts.len() - red - green
            )?;
        }
    }
    Ok(())
}

fn render_schedule_text(view: &ScheduleView, w: &mut dyn Write) -> std::io::Result<()> {
    match view {
        ScheduleView::Intervals { intervals } => {
            for interval in intervals {
                writeln!(w, "{interval}")?;
            }
        }
        ScheduleView::Models { models, .. } => {
            for model in models {
                writeln!(w, "{model}")?;
            }
        }
        ScheduleView::Parts { parts, .. } => {
            for part in parts {
                writeln!(w, "{}  {}", part.tier.as_str(), part.part)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use casebook_core::schedule::RawScheduleRow;

    fn schedule() -> MaintenanceSchedule {
        let row = |interval: Option<&str>, model: Option<&str>, parts: &str| RawScheduleRow {
            interval: interval.map(Into::into),
            model: model.map(Into::into),
            parts: Some(parts.into()),
        };
        MaintenanceSchedule::from_rows(vec![
            row(Some("500k保養"), Some("420單向軸承"), "B2476 軸承\nXYZ999 墊片"),
            row(None, Some("HGT-421"), "D3089 滾輪"),
            row(Some("1M保養"), Some("420單向軸承"), "D120 油封"),
        ])
    }

    fn rules() -> PartRuleTable {
        PartRuleTable::from_config(&ProjectConfig::default().part_rules)
    }

    #[test]
    fn no_interval_lists_intervals() {
        let view = build_view(&schedule(), &rules(), None, None).unwrap();
        assert_eq!(
            view,
            ScheduleView::Intervals {
                intervals: vec!["1M保養".into(), "500K保養".into()]
            }
        );
    }

    #[test]
    fn interval_lists_models_case_insensitively() {
        let view = build_view(&schedule(), &rules(), Some("500k保養"), None).unwrap();
        assert_eq!(
            view,
            ScheduleView::Models {
                interval: "500K保養".into(),
                models: vec!["420單向軸承".into(), "HGT-421".into()]
            }
        );
    }

    #[test]
    fn interval_and_model_classify_parts() {
        let view = build_view(&schedule(), &rules(), Some("500K保養"), Some("420單向軸承")).unwrap();
        let ScheduleView::Parts {
            red, green, parts, ..
        } = view
        else {
            panic!("expected parts view");
        };
        assert_eq!((red, green), (1, 0));
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[1].tier, PartTier::Normal);
    }

    #[test]
    fn unknown_interval_and_model_are_errors() {
        let err = build_view(&schedule(), &rules(), Some("2M"), None).unwrap_err();
        assert_eq!(err.0, ErrorCode::UnknownInterval);
        let err = build_view(&schedule(), &rules(), Some("1M保養"), Some("HGT-421")).unwrap_err();
        assert_eq!(err.0, ErrorCode::UnknownModel);
    }
}
