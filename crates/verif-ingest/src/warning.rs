use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::IngestError;

/// A recoverable per-source condition. Warnings never abort the pipeline;
/// they are returned alongside results so the presentation layer can show
/// them, and mirrored as `tracing::warn!` events at the point of origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceWarning {
    /// Name of the source the condition is attributed to.
    pub source: String,
    pub kind: WarningKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail")]
pub enum WarningKind {
    /// The source container could not be opened.
    OpenFailed(String),
    /// The source lacks the requested sheet and was skipped.
    MissingSheet(String),
    /// The requested sheet could not be read.
    ReadFailed { sheet: String, detail: String },
    /// A source sheet carried the reserved provenance column name; the
    /// column was dropped.
    ReservedColumn(String),
}

impl SourceWarning {
    pub fn open_failed(source: &str, error: &IngestError) -> Self {
        Self {
            source: source.to_string(),
            kind: WarningKind::OpenFailed(error.to_string()),
        }
    }

    pub fn missing_sheet(source: &str, sheet: &str) -> Self {
        Self {
            source: source.to_string(),
            kind: WarningKind::MissingSheet(sheet.to_string()),
        }
    }

    pub fn read_failed(source: &str, sheet: &str, error: &IngestError) -> Self {
        Self {
            source: source.to_string(),
            kind: WarningKind::ReadFailed {
                sheet: sheet.to_string(),
                detail: error.to_string(),
            },
        }
    }

    pub fn reserved_column(source: &str, column: &str) -> Self {
        Self {
            source: source.to_string(),
            kind: WarningKind::ReservedColumn(column.to_string()),
        }
    }
}

impl fmt::Display for SourceWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            WarningKind::OpenFailed(detail) => {
                write!(f, "source '{}' could not be opened: {detail}", self.source)
            }
            WarningKind::MissingSheet(sheet) => {
                write!(f, "source '{}' has no sheet {sheet:?}, skipped", self.source)
            }
            WarningKind::ReadFailed { sheet, detail } => {
                write!(
                    f,
                    "failed to read sheet {sheet:?} from source '{}': {detail}",
                    self.source
                )
            }
            WarningKind::ReservedColumn(column) => {
                write!(
                    f,
                    "source '{}' carries reserved column {column:?}; the sheet column was dropped",
                    self.source
                )
            }
        }
    }
}
