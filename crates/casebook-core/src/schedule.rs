//! Periodic maintenance schedule: which parts to replace per interval and model.
//!
//! Schedule sheets are authored with merged cells, so the interval and model
//! columns are only filled on the first row of each block. Ingestion
//! forward-fills those columns, upper-cases the interval label (collapsing
//! `500k保養` / `500K保養`), and drops rows that list no parts.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{CellValue, parse_rows};
use crate::parts::{PartRuleTable, PartTier};

/// One schedule row as exported.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RawScheduleRow {
    #[serde(default, alias = "保養類型")]
    pub interval: Option<CellValue>,
    #[serde(default, alias = "型號")]
    pub model: Option<CellValue>,
    #[serde(default, alias = "更換料件")]
    pub parts: Option<CellValue>,
}

/// A normalized schedule row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleEntry {
    /// Upper-cased, trimmed interval label (e.g. `"500K保養"`).
    pub interval: String,
    pub model: String,
    /// Parts cell; may hold several newline-separated parts.
    pub parts: String,
}

/// A single part line with its risk tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedPart {
    pub part: String,
    pub tier: PartTier,
    pub icon: &'static str,
}

/// Normalize an interval label the way schedule rows are stored.
#[must_use]
pub fn normalize_interval_label(label: &str) -> String {
    label.to_uppercase().trim().to_string()
}

#[derive(Debug, Clone, Default)]
pub struct MaintenanceSchedule {
    entries: Vec<ScheduleEntry>,
}

impl MaintenanceSchedule {
    /// Normalize raw rows: forward-fill interval/model, drop part-less rows.
    #[must_use]
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = RawScheduleRow>,
    {
        fn text(cell: Option<&CellValue>) -> Option<String> {
            cell.map(CellValue::to_text).filter(|s| !s.is_empty())
        }

        let mut last_interval = String::new();
        let mut last_model = String::new();
        let mut entries = Vec::new();

        for row in rows {
            if let Some(interval) = text(row.interval.as_ref()) {
                last_interval = normalize_interval_label(&interval);
            }
            if let Some(model) = text(row.model.as_ref()) {
                last_model = model;
            }
            let Some(parts) = text(row.parts.as_ref()) else {
                continue;
            };
            entries.push(ScheduleEntry {
                interval: last_interval.clone(),
                model: last_model.clone(),
                parts,
            });
        }

        Self { entries }
    }

    /// Parse a JSON row export.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not an array of row objects.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let rows: Vec<RawScheduleRow> = parse_rows(json)?;
        Ok(Self::from_rows(rows))
    }

    #[must_use]
    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    /// Distinct interval labels, sorted.
    #[must_use]
    pub fn intervals(&self) -> Vec<&str> {
        self.entries
            .iter()
            .map(|e| e.interval.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct models scheduled at `interval`, sorted.
    #[must_use]
    pub fn models_for(&self, interval: &str) -> Vec<&str> {
        let interval = normalize_interval_label(interval);
        self.entries
            .iter()
            .filter(|e| e.interval == interval)
            .map(|e| e.model.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Individual part lines for `(interval, model)`, in sheet order.
    #[must_use]
    pub fn part_lines(&self, interval: &str, model: &str) -> Vec<&str> {
        let interval = normalize_interval_label(interval);
        self.entries
            .iter()
            .filter(|e| e.interval == interval && e.model == model)
            .flat_map(|e| e.parts.lines())
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect()
    }

    /// Part lines for `(interval, model)` with their risk tiers.
    #[must_use]
    pub fn classified_parts(
        &self,
        interval: &str,
        model: &str,
        rules: &PartRuleTable,
    ) -> Vec<ClassifiedPart> {
        self.part_lines(interval, model)
            .into_iter()
            .map(|part| {
                let (tier, icon) = rules.classify(part, model, interval);
                ClassifiedPart {
                    part: part.to_string(),
                    tier,
                    icon,
                }
            })
            .collect()
    }
}

/// Load a schedule from a JSON row export on disk.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a row array.
pub fn load_schedule(path: &Path) -> Result<MaintenanceSchedule> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read schedule {}", path.display()))?;
    let schedule = MaintenanceSchedule::from_json_str(&content)
        .with_context(|| format!("Failed to parse schedule {}", path.display()))?;
    debug!(entries = schedule.entries().len(), "schedule loaded");
    Ok(schedule)
}
