//! Case data model and corpus ingestion.

mod case;
mod corpus;

pub use case::{CaseFields, CaseRecord, CellValue, MISSING_FIELD, RawCaseRow};
pub use corpus::{Corpus, Fingerprint, IngestError, load_corpus, parse_rows};
