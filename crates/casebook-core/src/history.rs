//! Per-model repair history views.
//!
//! Records for a model are grouped by topic in first-appearance order. A
//! target case (e.g. one picked from search results) can be pinned so it and
//! its topic group come first.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::model::{CaseRecord, Corpus};

/// Filter and pin options for [`case_history`].
#[derive(Debug, Clone, Default)]
pub struct HistoryQuery<'q> {
    pub model: &'q str,
    /// Restrict to one category; `None` shows all.
    pub category: Option<&'q str>,
    /// Identity of a record to surface first.
    pub pinned: Option<usize>,
}

/// Records sharing one topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicGroup<'a> {
    pub topic: &'a str,
    pub records: Vec<&'a CaseRecord>,
}

/// Distinct equipment models in the corpus, sorted.
#[must_use]
pub fn models(corpus: &Corpus) -> Vec<&str> {
    corpus
        .records()
        .iter()
        .map(CaseRecord::model)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Distinct categories recorded for `model`, sorted.
#[must_use]
pub fn categories<'a>(corpus: &'a Corpus, model: &str) -> Vec<&'a str> {
    corpus
        .records()
        .iter()
        .filter(|r| r.model() == model)
        .map(CaseRecord::category)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Topic-grouped history for a model.
#[must_use]
pub fn case_history<'a>(corpus: &'a Corpus, query: &HistoryQuery<'_>) -> Vec<TopicGroup<'a>> {
    let mut rows: Vec<&CaseRecord> = corpus
        .records()
        .iter()
        .filter(|r| r.model() == query.model)
        .filter(|r| query.category.is_none_or(|c| r.category() == c))
        .collect();

    if let Some(pinned) = query.pinned
        && let Some(pos) = rows.iter().position(|r| r.identity() == pinned)
    {
        let target = rows.remove(pos);
        rows.insert(0, target);
    }

    let mut groups: Vec<TopicGroup<'a>> = Vec::new();
    for record in rows {
        match groups.iter_mut().find(|g| g.topic == record.topic()) {
            Some(group) => group.records.push(record),
            None => groups.push(TopicGroup {
                topic: record.topic(),
                records: vec![record],
            }),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RawCaseRow;

    fn corpus() -> Corpus {
        let row = |model: &str, category: &str, topic: &str, cause: &str| RawCaseRow {
            model: Some(model.into()),
            category: Some(category.into()),
            topic: Some(topic.into()),
            cause: Some(cause.into()),
            ..RawCaseRow::default()
        };
        Corpus::from_rows(vec![
            row("HGT-421", "傳動", "皮帶斷裂", "老化"),
            row("HGT-421", "電控", "馬達異音", "軸承磨損"),
            row("420單向軸承", "傳動", "皮帶斷裂", "張力過大"),
            row("HGT-421", "傳動", "皮帶斷裂", "異物卡入"),
            row("HGT-421", "電控", "感應器失效", "線路鬆脫"),
        ])
    }

    #[test]
    fn models_and_categories_are_sorted() {
        let c = corpus();
        assert_eq!(models(&c), vec!["420單向軸承", "HGT-421"]);
        assert_eq!(categories(&c, "HGT-421"), vec!["傳動", "電控"]);
    }

    #[test]
    fn groups_follow_first_appearance() {
        let c = corpus();
        let groups = case_history(
            &c,
            &HistoryQuery {
                model: "HGT-421",
                ..HistoryQuery::default()
            },
        );
        let topics: Vec<_> = groups.iter().map(|g| g.topic).collect();
        assert_eq!(topics, vec!["皮帶斷裂", "馬達異音", "感應器失效"]);
        let ids: Vec<_> = groups[0].records.iter().map(|r| r.identity()).collect();
        assert_eq!(ids, vec![0, 3]);
    }

    #[test]
    fn category_filter_applies() {
        let c = corpus();
        let groups = case_history(
            &c,
            &HistoryQuery {
                model: "HGT-421",
                category: Some("電控"),
                pinned: None,
            },
        );
        assert_eq!(groups.len(), 2);
        assert!(groups.iter().all(|g| g.records.iter().all(|r| r.category() == "電控")));
    }

    #[test]
    fn pinned_case_leads() {
        let c = corpus();
        let groups = case_history(
            &c,
            &HistoryQuery {
                model: "HGT-421",
                category: None,
                pinned: Some(4),
            },
        );
        assert_eq!(groups[0].topic, "感應器失效");
        assert_eq!(groups[0].records[0].identity(), 4);

        let pinned_in_group = case_history(
            &c,
            &HistoryQuery {
                model: "HGT-421",
                category: None,
                pinned: Some(3),
            },
        );
        let ids: Vec<_> = pinned_in_group[0]
            .records
            .iter()
            .map(|r| r.identity())
            .collect();
        assert_eq!(ids, vec![3, 0]);
    }

    #[test]
    fn pin_outside_filter_is_ignored() {
        let c = corpus();
        let groups = case_history(
            &c,
            &HistoryQuery {
                model: "HGT-421",
                category: None,
                pinned: Some(2),
            },
        );
        assert_eq!(groups[0].topic, "皮帶斷裂");
        assert_eq!(groups[0].records[0].identity(), 0);
    }
}
