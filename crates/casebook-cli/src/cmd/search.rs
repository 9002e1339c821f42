//! `cb search`: rank historical cases against a fault description.
//!
//! Blends char n-gram TF-IDF similarity, fuzzy token-set overlap with topic
//! and cause, and keyword containment. Optional signals can be switched off
//! per invocation; ranking then proceeds on what remains.

use std::io::Write;
use std::path::{Path, PathBuf};

use casebook_core::capabilities::{Capabilities, detect_capabilities};
use casebook_core::config::ProjectConfig;
use casebook_core::error::ErrorCode;
use casebook_core::model::Corpus;
use casebook_search::{IndexCache, RankOutcome, RankingEngine};
use clap::Args;
use serde::Serialize;

use super::load_corpus_arg;
use crate::output::{OutputMode, fail, pretty_kv, pretty_rule, pretty_section, render_mode};

#[derive(Args, Debug)]
#[command(
    about = "Search historical repair cases",
    long_about = "Rank historical repair cases against a free-text fault description.\n\n\
                  Scores blend character n-gram similarity, fuzzy token overlap with the \
                  case topic and cause, and keyword containment.",
    after_help = "EXAMPLES:\n    # Describe the fault\n    cb search 馬達 聲音很大\n\n\
                  # Use a specific corpus export\n    cb search 皮帶斷裂 --corpus cases.json\n\n\
                  # Keyword containment only\n    cb search 皮帶 --no-vector --no-fuzzy\n\n\
                  # Machine-readable output\n    cb search 馬達異音 --format json"
)]
pub struct SearchArgs {
    /// Fault description. Multiple words are joined with spaces.
    pub query: Vec<String>,

    /// Corpus export (JSON array of rows). Defaults to `.casebook/cases.json`.
    #[arg(long, value_name = "PATH")]
    pub corpus: Option<PathBuf>,

    /// Maximum number of results (overrides `search.max_results`).
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Disable the n-gram vector signal.
    #[arg(long)]
    pub no_vector: bool,

    /// Disable the fuzzy token-set signal.
    #[arg(long)]
    pub no_fuzzy: bool,
}

impl SearchArgs {
    fn query_text(&self) -> String {
        self.query.join(" ")
    }

    const fn requested(&self) -> Capabilities {
        Capabilities {
            vector: !self.no_vector,
            fuzzy: !self.no_fuzzy,
        }
    }
}

/// JSON envelope for search output.
#[derive(Debug, Serialize)]
pub struct SearchOutput<'a> {
    pub count: usize,
    pub capabilities: Capabilities,
    #[serde(flatten)]
    pub outcome: RankOutcome<'a>,
}

/// Execute `cb search <query>`.
///
/// # Errors
///
/// Returns an error if the query is blank, the corpus cannot be loaded, or
/// output rendering fails.
pub fn run_search(
    args: &SearchArgs,
    config: &ProjectConfig,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let query = args.query_text();
    if query.trim().is_empty() {
        return Err(fail(output, ErrorCode::EmptyQuery, ""));
    }

    let corpus = load_corpus_arg(project_root, args.corpus.as_deref(), output)?;
    let caps = detect_capabilities(&config.search).intersect(args.requested());

    let mut config = config.clone();
    if let Some(limit) = args.limit {
        config.search.max_results = limit;
    }

    let mut cache = IndexCache::new();
    let search_output = search(&query, &corpus, &config, caps, &mut cache);

    render_mode(
        output,
        &search_output,
        |out, w| render_search_text(out, w),
        |out, w| render_search_pretty(out, w),
    )
}

fn search<'c>(
    query: &str,
    corpus: &'c Corpus,
    config: &ProjectConfig,
    caps: Capabilities,
    cache: &mut IndexCache,
) -> SearchOutput<'c> {
    let engine = RankingEngine::new(config, caps);
    let outcome = engine.rank(query, corpus, cache);
    SearchOutput {
        count: outcome.ranked.len(),
        capabilities: caps,
        outcome,
    }
}

fn render_search_pretty(out: &SearchOutput<'_>, w: &mut dyn Write) -> std::io::Result<()> {
    let outcome = &out.outcome;
    pretty_section(w, &format!("Diagnosis for '{}'", outcome.query))?;
    writeln!(w, "{}", outcome.summary)?;
    writeln!(w)?;

    if !outcome.ranked.is_empty() {
        writeln!(w, "{} similar case(s):", out.count)?;
        pretty_rule(w)?;
        writeln!(
            w,
            "{:>4}  {:>6}  {:<14}  {:<10}  TOPIC",
            "ID", "SCORE", "MODEL", "CATEGORY"
        )?;
        pretty_rule(w)?;
        for case in &outcome.ranked {
            let record = case.record;
            writeln!(
                w,
                "{:>4}  {:>6.3}  {:<14}  {:<10}  {}",
                record.identity(),
                case.final_score,
                record.model(),
                record.category(),
                record.topic()
            )?;
        }
        pretty_rule(w)?;
    }

    pretty_kv(w, "Web search", &outcome.fallback_url)?;
    if !out.capabilities.vector || !out.capabilities.fuzzy {
        pretty_kv(
            w,
            "Signals",
            format!(
                "vector={} fuzzy={} keyword=true",
                out.capabilities.vector, out.capabilities.fuzzy
            ),
        )?;
    }
    Ok(())
}

fn render_search_text(out: &SearchOutput<'_>, w: &mut dyn Write) -> std::io::Result<()> {
    let outcome = &out.outcome;
    if outcome.ranked.is_empty() {
        writeln!(w, "advice  no-results  query={}", outcome.query)?;
    }
    for case in &outcome.ranked {
        writeln!(
            w,
            "{}  score={:.3}  vector={:.3}  fuzzy={:.3}  keyword={:.3}  {}  {}",
            case.record.identity(),
            case.final_score,
            case.vector_score,
            case.fuzzy_score,
            case.keyword_score,
            case.record.model(),
            case.record.topic()
        )?;
    }
    if let Some(best) = outcome.evidence {
        writeln!(w, "evidence  {}", best.identity())?;
    }
    writeln!(w, "fallback  {}", outcome.fallback_url)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
