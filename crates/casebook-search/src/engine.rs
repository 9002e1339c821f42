//! The `rank` entry point: expansion, signals, blend, evidence, summary.

use casebook_core::capabilities::{Capabilities, detect_capabilities};
use casebook_core::config::{ProjectConfig, SearchConfig};
use casebook_core::model::{CaseRecord, Corpus};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::evidence::{clean_text, select_best_evidence};
use crate::expand::SynonymExpander;
use crate::fusion::{ScoredCase, blend, threshold};
use crate::lexical::IndexCache;
use crate::signals::{SignalInput, SignalSet};

/// Shown when no case clears the threshold.
pub const NO_MATCH_SUMMARY: &str = "目前資料庫中找不到相似度夠高的案例。";

/// Shown in place of a cause too short to be useful.
pub const NO_CLEAR_CAUSE: &str = "暫無明確內部紀錄，建議參考下方外部搜尋。";

/// Appended to the model and topic of the best evidence for the web search.
const TROUBLESHOOTING_SUFFIX: &str = "故障排除";

/// Prefixed to the raw query when nothing internal matched.
const GENERIC_SEARCH_PREFIX: &str = "設備維修";

/// Result of one ranking pass.
#[derive(Debug, Clone, Serialize)]
pub struct RankOutcome<'a> {
    pub query: String,
    /// At most `max_results` cases, best first.
    pub ranked: Vec<ScoredCase<'a>>,
    /// Case backing the summary, when anything ranked.
    pub evidence: Option<&'a CaseRecord>,
    /// Human-readable diagnosis. Empty when the query or corpus was empty.
    pub summary: String,
    pub fallback_url: String,
}

impl RankOutcome<'_> {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }
}

/// Hybrid ranker configured from [`ProjectConfig`].
#[derive(Debug)]
pub struct RankingEngine {
    expander: SynonymExpander,
    signals: SignalSet,
    capabilities: Capabilities,
    min_score: f32,
    max_results: usize,
    fallback_search_url: String,
}

impl RankingEngine {
    /// Build an engine from configuration and the active capabilities.
    #[must_use]
    pub fn new(config: &ProjectConfig, capabilities: Capabilities) -> Self {
        let SearchConfig {
            max_results,
            min_score,
            weights,
            fallback_search_url,
            ..
        } = &config.search;

        Self {
            expander: SynonymExpander::new(&config.synonyms),
            signals: SignalSet::new(*weights, capabilities),
            capabilities,
            min_score: *min_score,
            max_results: *max_results,
            fallback_search_url: fallback_search_url.clone(),
        }
    }

    #[must_use]
    pub const fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    #[must_use]
    pub const fn expander(&self) -> &SynonymExpander {
        &self.expander
    }

    /// Rank `corpus` against `query`.
    ///
    /// An empty query or empty corpus short-circuits to an empty ranking, an
    /// empty summary and the generic search link. A whitespace-only query is
    /// ranked like any other and ends in the no-match summary. The lexical index comes
    /// from `cache`, rebuilt first if the corpus changed since it was cached.
    #[instrument(skip(self, corpus, cache), fields(records = corpus.len()))]
    pub fn rank<'c>(
        &self,
        query: &str,
        corpus: &'c Corpus,
        cache: &mut IndexCache,
    ) -> RankOutcome<'c> {
        if query.is_empty() || corpus.is_empty() {
            debug!("empty query or corpus, skipping ranking");
            return RankOutcome {
                query: query.to_string(),
                ranked: Vec::new(),
                evidence: None,
                summary: String::new(),
                fallback_url: self.fallback_search_url.clone(),
            };
        }

        let expanded = self.expander.expand(query);
        let index = cache.get_or_build(corpus, self.capabilities);
        let input = SignalInput {
            query,
            expanded_query: &expanded,
            records: corpus.records(),
            index: index.as_deref(),
        };

        let scores = self.signals.score_all(&input);
        let ranked = threshold(
            blend(corpus.records(), &scores),
            self.min_score,
            self.max_results,
        );
        let evidence = select_best_evidence(&ranked);
        debug!(
            expanded = %expanded,
            hits = ranked.len(),
            evidence = evidence.map(CaseRecord::identity),
            "ranking pass complete"
        );

        let (summary, phrase) = evidence.map_or_else(
            || {
                (
                    NO_MATCH_SUMMARY.to_string(),
                    format!("{GENERIC_SEARCH_PREFIX} {query}"),
                )
            },
            |best| {
                let topic = clean_text(best.topic());
                (
                    summarize(&topic, &clean_text(best.cause())),
                    format!("{} {topic} {TROUBLESHOOTING_SUFFIX}", best.model()),
                )
            },
        );

        RankOutcome {
            query: query.to_string(),
            ranked,
            evidence,
            summary,
            fallback_url: self.search_url(&phrase),
        }
    }

    /// External web-search link for `phrase`.
    #[must_use]
    pub fn search_url(&self, phrase: &str) -> String {
        format!("{}{}", self.fallback_search_url, urlencoding::encode(phrase))
    }
}

/// One-shot ranking with built-in configuration and compiled capabilities.
///
/// Builds a throwaway index; callers ranking repeatedly over the same corpus
/// should hold a [`RankingEngine`] and an [`IndexCache`] instead.
#[must_use]
pub fn rank<'c>(query: &str, corpus: &'c Corpus) -> RankOutcome<'c> {
    let config = ProjectConfig::default();
    let capabilities = detect_capabilities(&config.search);
    RankingEngine::new(&config, capabilities).rank(query, corpus, &mut IndexCache::new())
}

fn summarize(topic: &str, cause: &str) -> String {
    let direction = if cause.chars().count() > 1 {
        cause
    } else {
        NO_CLEAR_CAUSE
    };
    format!("分析您的描述，資料庫中最相似的案例為「{topic}」。\n建議檢查方向：{direction}")
}
