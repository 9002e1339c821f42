//! `cb history`: repair history for one equipment model, grouped by topic.

use std::io::Write;
use std::path::{Path, PathBuf};

use casebook_core::error::ErrorCode;
use casebook_core::history::{HistoryQuery, TopicGroup, case_history, categories, models};
use casebook_core::model::Corpus;
use clap::Args;
use serde::Serialize;

use super::load_corpus_arg;
use crate::output::{OutputMode, fail, pretty_kv, pretty_rule, pretty_section, render_mode};

#[derive(Args, Debug)]
#[command(
    about = "Show repair history for a model",
    long_about = "List historical cases for an equipment model grouped by topic. Without \
                  --model, list the models in the corpus.",
    after_help = "EXAMPLES:\n    # Known models\n    cb history\n\n\
                  # History for one model and category\n    cb history --model HGT-421 --category 傳動\n\n\
                  # Jump to a case found by search\n    cb history --model HGT-421 --case 12"
)]
pub struct HistoryArgs {
    /// Corpus export (JSON array of rows). Defaults to `.casebook/cases.json`.
    #[arg(long, value_name = "PATH")]
    pub corpus: Option<PathBuf>,

    /// Equipment model.
    #[arg(long)]
    pub model: Option<String>,

    /// Restrict to one category.
    #[arg(long, requires = "model")]
    pub category: Option<String>,

    /// Case identity to show first.
    #[arg(long = "case", value_name = "ID", requires = "model")]
    pub pinned: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum HistoryView<'a> {
    Models {
        models: Vec<&'a str>,
    },
    Topics {
        model: String,
        categories: Vec<&'a str>,
        groups: Vec<TopicGroup<'a>>,
    },
}

/// Execute `cb history`.
///
/// # Errors
///
/// Returns an error if the corpus cannot be loaded, the model or pinned case
/// is unknown, or output rendering fails.
pub fn run_history(args: &HistoryArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let corpus = load_corpus_arg(project_root, args.corpus.as_deref(), output)?;
    let view = build_view(&corpus, args).map_err(|(code, detail)| fail(output, code, detail))?;

    render_mode(
        output,
        &view,
        |v, w| render_history_text(v, w),
        |v, w| render_history_pretty(v, w),
    )
}

fn build_view<'a>(
    corpus: &'a Corpus,
    args: &HistoryArgs,
) -> Result<HistoryView<'a>, (ErrorCode, String)> {
    let Some(model) = args.model.as_deref() else {
        return Ok(HistoryView::Models {
            models: models(corpus),
        });
    };

    let known = categories(corpus, model);
    if known.is_empty() {
        return Err((ErrorCode::UnknownModel, model.to_string()));
    }
    if let Some(id) = args.pinned
        && corpus.get(id).is_none_or(|r| r.model() != model)
    {
        return Err((ErrorCode::CaseNotFound, format!("{id} for {model}")));
    }

    let query = HistoryQuery {
        model,
        category: args.category.as_deref(),
        pinned: args.pinned,
    };
    Ok(HistoryView::Topics {
        model: model.to_string(),
        categories: known,
        groups: case_history(corpus, &query),
    })
}

fn render_history_pretty(view: &HistoryView<'_>, w: &mut dyn Write) -> std::io::Result<()> {
    match view {
        HistoryView::Models { models } => {
            pretty_section(w, "Models")?;
            for model in models {
                writeln!(w, "  {model}")?;
            }
        }
        HistoryView::Topics {
            model,
            categories,
            groups,
        } => {
            pretty_section(w, &format!("History for {model}"))?;
            pretty_kv(w, "Categories", categories.join(", "))?;
            for group in groups {
                pretty_rule(w)?;
                writeln!(w, "{} ({})", group.topic, group.records.len())?;
                for record in &group.records {
                    writeln!(w, "  #{:<4} cause: {}", record.identity(), record.cause())?;
                    writeln!(w, "        fix:   {}", record.resolution())?;
                }
            }
        }
    }
    Ok(())
}

fn render_history_text(view: &HistoryView<'_>, w: &mut dyn Write) -> std::io::Result<()> {
    match view {
        HistoryView::Models { models } => {
            for model in models {
                writeln!(w, "{model}")?;
            }
        }
        HistoryView::Topics { groups, .. } => {
            for group in groups {
                for record in &group.records {
                    writeln!(
                        w,
                        "{}  {}  {}  {}",
                        record.identity(),
                        group.topic,
                        record.category(),
                        record.cause()
                    )?;
                }
            }
        }
    }
    Ok(())
}
