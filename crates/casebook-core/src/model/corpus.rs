//! Corpus snapshots and their content fingerprints.
//!
//! A [`Corpus`] is the immutable, in-memory set of [`CaseRecord`]s a ranking
//! pass runs over. Its [`Fingerprint`] is a BLAKE3 digest of every record's
//! content, so any edit to any field yields a different fingerprint and
//! invalidates derived indices.

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::debug;

use super::case::{CaseFields, CaseRecord, RawCaseRow};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Shape problems found while ingesting a JSON row export.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// The document root was not a JSON array of rows.
    #[error("expected a JSON array of rows, found {found}")]
    NotAnArray {
        /// JSON type that was found instead.
        found: &'static str,
    },

    /// A row was not a JSON object.
    #[error("row {row} is not an object (found {found})")]
    RowNotObject {
        /// Zero-based row position.
        row: usize,
        /// JSON type that was found instead.
        found: &'static str,
    },

    /// A row object could not be mapped onto the expected columns.
    #[error("row {row} has invalid cells: {source}")]
    InvalidRow {
        /// Zero-based row position.
        row: usize,
        #[source]
        source: serde_json::Error,
    },
}

const fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Parse a JSON array of row objects into typed rows.
///
/// # Errors
///
/// Returns [`IngestError`] naming the first offending row.
pub fn parse_rows<T: serde::de::DeserializeOwned>(json: &str) -> Result<Vec<T>> {
    let root: serde_json::Value = serde_json::from_str(json).context("invalid JSON document")?;
    let serde_json::Value::Array(items) = root else {
        return Err(IngestError::NotAnArray {
            found: json_kind(&root),
        }
        .into());
    };

    let mut rows = Vec::with_capacity(items.len());
    for (row, item) in items.into_iter().enumerate() {
        if !item.is_object() {
            return Err(IngestError::RowNotObject {
                row,
                found: json_kind(&item),
            }
            .into());
        }
        let parsed = serde_json::from_value(item)
            .map_err(|source| IngestError::InvalidRow { row, source })?;
        rows.push(parsed);
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Fingerprint
// ---------------------------------------------------------------------------

/// Content digest of a corpus snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint(blake3::Hash);

impl Fingerprint {
    /// Fingerprint a sequence of records in order.
    #[must_use]
    pub fn of(records: &[CaseRecord]) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&(records.len() as u64).to_le_bytes());
        for record in records {
            hasher.update(&(record.identity() as u64).to_le_bytes());
            let fields = record.fields();
            for text in [
                &fields.model,
                &fields.category,
                &fields.topic,
                &fields.cause,
                &fields.resolution,
                &fields.verification,
                &fields.notes,
            ] {
                // Length prefix keeps field boundaries unambiguous.
                hasher.update(&(text.len() as u64).to_le_bytes());
                hasher.update(text.as_bytes());
            }
        }
        Self(hasher.finalize())
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "blake3:{}", self.0.to_hex())
    }
}

impl Serialize for Fingerprint {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ---------------------------------------------------------------------------
// Corpus
// ---------------------------------------------------------------------------

/// Immutable snapshot of historical cases.
#[derive(Debug, Clone)]
pub struct Corpus {
    records: Vec<CaseRecord>,
    fingerprint: Fingerprint,
}

impl Corpus {
    /// Normalize raw rows into a snapshot. Identities follow row order.
    #[must_use]
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = RawCaseRow>,
    {
        let records = rows
            .into_iter()
            .enumerate()
            .map(|(identity, row)| CaseRecord::new(identity, CaseFields::from_raw(&row)))
            .collect();
        Self::from_records(records)
    }

    /// Wrap already-normalized records.
    #[must_use]
    pub fn from_records(records: Vec<CaseRecord>) -> Self {
        let fingerprint = Fingerprint::of(&records);
        Self {
            records,
            fingerprint,
        }
    }

    /// Parse a JSON row export.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not an array of row objects.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let rows: Vec<RawCaseRow> = parse_rows(json)?;
        Ok(Self::from_rows(rows))
    }

    #[must_use]
    pub fn records(&self) -> &[CaseRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub const fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }

    /// Look up a record by its snapshot identity.
    #[must_use]
    pub fn get(&self, identity: usize) -> Option<&CaseRecord> {
        self.records
            .get(identity)
            .filter(|r| r.identity() == identity)
            .or_else(|| self.records.iter().find(|r| r.identity() == identity))
    }

    /// Composite texts in corpus order.
    pub fn composite_texts(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(CaseRecord::composite_text)
    }
}

impl Default for Corpus {
    fn default() -> Self {
        Self::from_records(Vec::new())
    }
}

/// Load a corpus snapshot from a JSON row export on disk.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a row array.
pub fn load_corpus(path: &Path) -> Result<Corpus> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read corpus {}", path.display()))?;
    let corpus = Corpus::from_json_str(&content)
        .with_context(|| format!("Failed to parse corpus {}", path.display()))?;
    debug!(
        records = corpus.len(),
        fingerprint = %corpus.fingerprint(),
        "corpus loaded"
    );
    Ok(corpus)
}
