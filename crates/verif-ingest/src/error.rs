//! Error types for workbook ingestion.

use thiserror::Error;

/// Source-level failures. Every variant names the offending source so the
/// caller can surface an attributable message; the catalog and merger treat
/// all of these as recoverable (skip the source, keep going).
#[derive(Debug, Error)]
pub enum IngestError {
    /// The source container could not be opened or parsed.
    #[error("failed to open source '{src}': {detail}")]
    SourceOpen { src: String, detail: String },

    /// The requested sheet does not exist in the source.
    #[error("source '{src}' has no sheet {sheet:?}")]
    MissingSheet { src: String, sheet: String },

    /// The sheet exists but reading its rows failed.
    #[error("failed to read sheet {sheet:?} from source '{src}': {detail}")]
    SheetRead {
        src: String,
        sheet: String,
        detail: String,
    },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
