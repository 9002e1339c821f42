use std::fmt;

/// Failure categories reported by the CLI.
///
/// `E1xxx` are input-file problems; `E2xxx` reject the request itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    CorpusNotFound,
    ConfigParseError,
    CorpusParseError,
    ScheduleParseError,
    InspectionParseError,
    EmptyQuery,
    UnknownModel,
    UnknownInterval,
    CaseNotFound,
    UnknownInspectionItem,
}

impl ErrorCode {
    /// Stable `E####` identifier.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::CorpusNotFound => "E1001",
            Self::ConfigParseError => "E1002",
            Self::CorpusParseError => "E1003",
            Self::ScheduleParseError => "E1004",
            Self::InspectionParseError => "E1005",
            Self::EmptyQuery => "E2001",
            Self::UnknownModel => "E2002",
            Self::UnknownInterval => "E2003",
            Self::CaseNotFound => "E2004",
            Self::UnknownInspectionItem => "E2005",
        }
    }

    /// One-line description; callers append the offending value.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::CorpusNotFound => "Case corpus not found",
            Self::ConfigParseError => "Config file parse error",
            Self::CorpusParseError => "Case corpus parse error",
            Self::ScheduleParseError => "Maintenance schedule parse error",
            Self::InspectionParseError => "Inspection checklist parse error",
            Self::EmptyQuery => "Search query is empty",
            Self::UnknownModel => "Unknown equipment model",
            Self::UnknownInterval => "Unknown maintenance interval",
            Self::CaseNotFound => "Case not found",
            Self::UnknownInspectionItem => "Unknown inspection item",
        }
    }

    /// What to try next, if there is anything useful to say.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::CorpusNotFound => Some("Pass --corpus with the path to a JSON row export."),
            Self::ConfigParseError => Some("Fix syntax in .casebook/config.toml and retry."),
            Self::CorpusParseError | Self::ScheduleParseError | Self::InspectionParseError => {
                Some("Export the sheet as a JSON array of row objects.")
            }
            Self::EmptyQuery => Some("Describe the fault, e.g. `cb search 馬達異音`."),
            Self::UnknownModel => Some("Run without --model to list known models."),
            Self::UnknownInterval => Some("Run without --interval to list known intervals."),
            Self::UnknownInspectionItem => Some("Run without --item to list inspection items."),
            Self::CaseNotFound => None,
        }
    }

    /// Name used as `error_code` in JSON output.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::CorpusNotFound => "corpus_not_found",
            Self::ConfigParseError => "config_parse_error",
            Self::CorpusParseError => "corpus_parse_error",
            Self::ScheduleParseError => "schedule_parse_error",
            Self::InspectionParseError => "inspection_parse_error",
            Self::EmptyQuery => "empty_query",
            Self::UnknownModel => "unknown_model",
            Self::UnknownInterval => "unknown_interval",
            Self::CaseNotFound => "case_not_found",
            Self::UnknownInspectionItem => "unknown_inspection_item",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
