//! Data model for the verification workbook analytics core.
//!
//! Pure types shared by the ingestion and analysis crates: the per-request
//! selection configuration, the typed cell surface of the merged table,
//! frequency/cross-tab result tables, and confusion-matrix counts, metrics,
//! and grouping-key decomposition.

pub mod error;
pub mod results;
pub mod selection;
pub mod stats;
pub mod table;

pub use error::{ModelError, Result};
pub use results::{
    CrossTabEntry, CrossTabResult, FrequencyEntry, FrequencyResult, KeyCountsRow, KeyMetricsRow,
    MalformedKey, SourceCountsRow, SourceCountsTable, SourceMetricsRow, SourceMetricsTable,
};
pub use selection::{
    DEFAULT_KEY_COLUMN, DEFAULT_OUTCOME_COLUMN, DEFAULT_SHEET_NAME, DEFAULT_TOP_N,
    DEFAULT_TYPE_COLUMN, GroupingKeySelection, SetFilter,
};
pub use stats::{
    ConfusionCounts, ConfusionMetrics, KeyParts, LABEL_FALSE_NEGATIVE, LABEL_FALSE_POSITIVE,
    LABEL_TRUE_NEGATIVE, LABEL_TRUE_POSITIVE,
};
pub use table::{CellValue, ColumnType};
