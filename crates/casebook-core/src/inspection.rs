//! Inspection checklist: what to check on each part of a machine.
//!
//! Like the schedule sheet, the checklist uses merged cells, so the item
//! column is only filled on the first row of each block and is forward-filled
//! on ingestion. Rows with a blank detail cell are kept; they simply contribute
//! no check lines.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{CellValue, parse_rows};

/// One checklist row as exported.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RawInspectionRow {
    #[serde(default, alias = "項目各部")]
    pub item: Option<CellValue>,
    #[serde(default, alias = "各部細項")]
    pub details: Option<CellValue>,
}

/// A normalized checklist row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InspectionEntry {
    /// Machine part being inspected. Empty only for rows above the first item.
    pub item: String,
    /// Details cell; may hold several newline-separated checks, or nothing.
    pub details: String,
}

#[derive(Debug, Clone, Default)]
pub struct InspectionChecklist {
    entries: Vec<InspectionEntry>,
}

impl InspectionChecklist {
    /// Normalize raw rows, forward-filling the item column.
    #[must_use]
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = RawInspectionRow>,
    {
        let mut last_item = String::new();
        let entries = rows
            .into_iter()
            .map(|row| {
                let item = row
                    .item
                    .as_ref()
                    .map(CellValue::to_text)
                    .filter(|s| !s.is_empty());
                if let Some(item) = item {
                    last_item = item;
                }
                InspectionEntry {
                    item: last_item.clone(),
                    details: row
                        .details
                        .as_ref()
                        .map(CellValue::to_text)
                        .unwrap_or_default(),
                }
            })
            .collect();
        Self { entries }
    }

    /// Parse a JSON row export.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not an array of row objects.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let rows: Vec<RawInspectionRow> = parse_rows(json)?;
        Ok(Self::from_rows(rows))
    }

    #[must_use]
    pub fn entries(&self) -> &[InspectionEntry] {
        &self.entries
    }

    /// Distinct inspection items, sorted. Rows above the first item are not
    /// listed.
    #[must_use]
    pub fn items(&self) -> Vec<&str> {
        self.entries
            .iter()
            .map(|e| e.item.as_str())
            .filter(|item| !item.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Individual check lines for `item`, in sheet order.
    #[must_use]
    pub fn detail_lines(&self, item: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.item == item)
            .flat_map(|e| e.details.lines())
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect()
    }

    /// Whether any row belongs to `item`.
    #[must_use]
    pub fn contains_item(&self, item: &str) -> bool {
        !item.is_empty() && self.entries.iter().any(|e| e.item == item)
    }
}

/// Load a checklist from a JSON row export on disk.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a row array.
pub fn load_inspection(path: &Path) -> Result<InspectionChecklist> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read checklist {}", path.display()))?;
    let checklist = InspectionChecklist::from_json_str(&content)
        .with_context(|| format!("Failed to parse checklist {}", path.display()))?;
    debug!(entries = checklist.entries().len(), "inspection checklist loaded");
    Ok(checklist)
}
