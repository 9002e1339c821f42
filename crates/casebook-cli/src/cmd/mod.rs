//! Subcommand handlers and the loaders they share.

pub mod capabilities;
pub mod completions;
pub mod history;
pub mod inspect;
pub mod parts;
pub mod schedule;
pub mod search;

use std::path::{Path, PathBuf};

use anyhow::Result;
use casebook_core::config::{ProjectConfig, resolve_config};
use casebook_core::error::ErrorCode;
use casebook_core::inspection::{InspectionChecklist, load_inspection};
use casebook_core::model::{Corpus, load_corpus};
use casebook_core::schedule::{MaintenanceSchedule, load_schedule};

use crate::output::{OutputMode, fail};

/// Default corpus export, relative to the project root.
pub const DEFAULT_CORPUS_PATH: &str = ".casebook/cases.json";

/// Default schedule export, relative to the project root.
pub const DEFAULT_SCHEDULE_PATH: &str = ".casebook/schedule.json";

/// Default inspection checklist export, relative to the project root.
pub const DEFAULT_INSPECTION_PATH: &str = ".casebook/inspection.json";

/// Resolve configuration, reporting parse failures as `E1002`.
///
/// # Errors
///
/// Returns an error if a config file exists but cannot be parsed.
pub fn load_config(
    project_root: &Path,
    explicit: Option<&Path>,
    output: OutputMode,
) -> Result<ProjectConfig> {
    resolve_config(project_root, explicit)
        .map_err(|e| fail(output, ErrorCode::ConfigParseError, format!("{e:#}")))
}

/// Load the corpus at `path` (or the project default).
///
/// # Errors
///
/// `E1001` when the file is missing, `E1003` when it is not a row array.
pub fn load_corpus_arg(
    project_root: &Path,
    path: Option<&Path>,
    output: OutputMode,
) -> Result<Corpus> {
    let path = resolve_path(project_root, path, DEFAULT_CORPUS_PATH);
    if !path.exists() {
        return Err(fail(
            output,
            ErrorCode::CorpusNotFound,
            path.display().to_string(),
        ));
    }
    load_corpus(&path).map_err(|e| fail(output, ErrorCode::CorpusParseError, format!("{e:#}")))
}

/// Load the maintenance schedule at `path` (or the project default).
///
/// # Errors
///
/// `E1001` when the file is missing, `E1004` when it is not a row array.
pub fn load_schedule_arg(
    project_root: &Path,
    path: Option<&Path>,
    output: OutputMode,
) -> Result<MaintenanceSchedule> {
    let path = resolve_path(project_root, path, DEFAULT_SCHEDULE_PATH);
    if !path.exists() {
        return Err(fail(
            output,
            ErrorCode::CorpusNotFound,
            path.display().to_string(),
        ));
    }
    load_schedule(&path)
        .map_err(|e| fail(output, ErrorCode::ScheduleParseError, format!("{e:#}")))
}

/// Load the inspection checklist at `path` (or the project default).
///
/// # Errors
///
/// `E1001` when the file is missing, `E1005` when it is not a row array.
pub fn load_inspection_arg(
    project_root: &Path,
    path: Option<&Path>,
    output: OutputMode,
) -> Result<InspectionChecklist> {
    let path = resolve_path(project_root, path, DEFAULT_INSPECTION_PATH);
    if !path.exists() {
        return Err(fail(
            output,
            ErrorCode::CorpusNotFound,
            path.display().to_string(),
        ));
    }
    load_inspection(&path)
        .map_err(|e| fail(output, ErrorCode::InspectionParseError, format!("{e:#}")))
}

fn resolve_path(project_root: &Path, explicit: Option<&Path>, default: &str) -> PathBuf {
    explicit.map_or_else(|| project_root.join(default), Path::to_path_buf)
}
