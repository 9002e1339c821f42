//! Historical repair case records.
//!
//! A [`CaseRecord`] is built once per corpus snapshot from a [`RawCaseRow`]
//! and never mutated afterwards. The weighted `composite_text` is derived from
//! the source fields and is the unit every lexical signal compares against.

use serde::{Deserialize, Serialize};

/// Placeholder written into any field missing from a source row.
pub const MISSING_FIELD: &str = "無";

/// Repetition weights for the composite text, in field order.
const MODEL_WEIGHT: usize = 2;
const TOPIC_WEIGHT: usize = 5;
const CAUSE_WEIGHT: usize = 3;

// ---------------------------------------------------------------------------
// Raw rows
// ---------------------------------------------------------------------------

/// A spreadsheet cell as it arrives from an export: text, number, or boolean.
///
/// Exports routinely turn model numbers such as `420` into JSON numbers, so
/// every cell is accepted loosely and rendered back to text.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Number(serde_json::Number),
    Bool(bool),
}

impl CellValue {
    /// Render the cell as trimmed text.
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Self::Text(s) => s.trim().to_string(),
            Self::Number(n) => n.to_string(),
            Self::Bool(b) => b.to_string(),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// One row of repair history exactly as the caller supplied it.
///
/// Field aliases accept the column headers used by the maintenance team's
/// spreadsheet so exports can be fed in without renaming.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RawCaseRow {
    #[serde(default, alias = "設備型號")]
    pub model: Option<CellValue>,
    #[serde(default, alias = "大標")]
    pub category: Option<CellValue>,
    #[serde(default, alias = "主題(事件簡述)")]
    pub topic: Option<CellValue>,
    #[serde(default, alias = "原因(異常查找、分析)")]
    pub cause: Option<CellValue>,
    #[serde(default, alias = "處置、應對")]
    pub resolution: Option<CellValue>,
    #[serde(default, alias = "驗證是否排除(驗證作法)")]
    pub verification: Option<CellValue>,
    #[serde(default, alias = "備註(建議事項及補充事項)")]
    pub notes: Option<CellValue>,
}

// ---------------------------------------------------------------------------
// Normalized records
// ---------------------------------------------------------------------------

/// The textual fields of a case after ingestion.
///
/// Every field is present and trimmed. Fields absent from the source row hold
/// [`MISSING_FIELD`]; cells that were present but blank stay empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseFields {
    pub model: String,
    pub category: String,
    pub topic: String,
    pub cause: String,
    pub resolution: String,
    pub verification: String,
    pub notes: String,
}

impl CaseFields {
    /// Normalize a raw row, substituting [`MISSING_FIELD`] for absent cells.
    #[must_use]
    pub fn from_raw(row: &RawCaseRow) -> Self {
        fn cell(value: Option<&CellValue>) -> String {
            value.map_or_else(|| MISSING_FIELD.to_string(), CellValue::to_text)
        }

        Self {
            model: cell(row.model.as_ref()),
            category: cell(row.category.as_ref()),
            topic: cell(row.topic.as_ref()),
            cause: cell(row.cause.as_ref()),
            resolution: cell(row.resolution.as_ref()),
            verification: cell(row.verification.as_ref()),
            notes: cell(row.notes.as_ref()),
        }
    }
}

/// One historical repair entry within a corpus snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseRecord {
    identity: usize,
    #[serde(flatten)]
    fields: CaseFields,
    #[serde(skip)]
    composite_text: String,
}

impl CaseRecord {
    /// Build a record at position `identity` within its snapshot.
    #[must_use]
    pub fn new(identity: usize, fields: CaseFields) -> Self {
        let composite_text = composite_text(&fields);
        Self {
            identity,
            fields,
            composite_text,
        }
    }

    /// Replace the source fields, recomputing the composite text.
    #[must_use]
    pub fn with_fields(self, fields: CaseFields) -> Self {
        Self::new(self.identity, fields)
    }

    /// Position of this record within its corpus snapshot.
    #[must_use]
    pub const fn identity(&self) -> usize {
        self.identity
    }

    #[must_use]
    pub const fn fields(&self) -> &CaseFields {
        &self.fields
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.fields.model
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.fields.category
    }

    #[must_use]
    pub fn topic(&self) -> &str {
        &self.fields.topic
    }

    #[must_use]
    pub fn cause(&self) -> &str {
        &self.fields.cause
    }

    #[must_use]
    pub fn resolution(&self) -> &str {
        &self.fields.resolution
    }

    /// Weighted concatenation used for lexical comparison.
    #[must_use]
    pub fn composite_text(&self) -> &str {
        &self.composite_text
    }
}

/// Concatenate `model`×2, `topic`×5, `cause`×3 (each followed by a space)
/// and the resolution once.
fn composite_text(fields: &CaseFields) -> String {
    let mut out = String::with_capacity(
        (fields.model.len() + 1) * MODEL_WEIGHT
            + (fields.topic.len() + 1) * TOPIC_WEIGHT
            + (fields.cause.len() + 1) * CAUSE_WEIGHT
            + fields.resolution.len(),
    );
    for (text, weight) in [
        (&fields.model, MODEL_WEIGHT),
        (&fields.topic, TOPIC_WEIGHT),
        (&fields.cause, CAUSE_WEIGHT),
    ] {
        for _ in 0..weight {
            out.push_str(text);
            out.push(' ');
        }
    }
    out.push_str(&fields.resolution);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(model: &str, topic: &str, cause: &str, resolution: &str) -> CaseFields {
        CaseFields {
            model: model.into(),
            topic: topic.into(),
            cause: cause.into(),
            resolution: resolution.into(),
            ..CaseFields::default()
        }
    }

    #[test]
    fn composite_text_repeats_fields_by_weight() {
        let record = CaseRecord::new(0, fields("M1", "T", "C", "R"));
        assert_eq!(record.composite_text(), "M1 M1 T T T T T C C C R");
    }

    #[test]
    fn with_fields_recomputes_composite() {
        let record = CaseRecord::new(3, fields("M1", "old", "C", "R"));
        let updated = record.with_fields(fields("M1", "new", "C", "R"));
        assert_eq!(updated.identity(), 3);
        assert!(updated.composite_text().contains("new new new new new"));
        assert!(!updated.composite_text().contains("old"));
    }

    #[test]
    fn missing_cells_become_placeholder() {
        let row = RawCaseRow {
            model: Some("HGT-421".into()),
            topic: Some("  皮帶斷裂 ".into()),
            ..RawCaseRow::default()
        };
        let normalized = CaseFields::from_raw(&row);
        assert_eq!(normalized.model, "HGT-421");
        assert_eq!(normalized.topic, "皮帶斷裂");
        assert_eq!(normalized.cause, MISSING_FIELD);
        assert_eq!(normalized.notes, MISSING_FIELD);
    }

    #[test]
    fn blank_cells_stay_blank() {
        let row = RawCaseRow {
            cause: Some("   ".into()),
            ..RawCaseRow::default()
        };
        assert_eq!(CaseFields::from_raw(&row).cause, "");
    }

    #[test]
    fn spreadsheet_headers_and_numbers_deserialize() {
        let row: RawCaseRow = serde_json::from_str(
            r#"{"設備型號": 420, "主題(事件簡述)": "馬達異音", "原因(異常查找、分析)": "軸承磨損"}"#,
        )
        .expect("row should parse");
        let normalized = CaseFields::from_raw(&row);
        assert_eq!(normalized.model, "420");
        assert_eq!(normalized.topic, "馬達異音");
        assert_eq!(normalized.cause, "軸承磨損");
        assert_eq!(normalized.resolution, MISSING_FIELD);
    }
}
