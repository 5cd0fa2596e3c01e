use serde::{Deserialize, Serialize};

use crate::stats::{ConfusionCounts, ConfusionMetrics, KeyParts};

/// One (value, count) entry of a frequency ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyEntry {
    pub value: String,
    pub count: u64,
}

/// A per-category frequency table, descending by count. Ties keep the
/// order in which the values were first encountered in the source rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyResult {
    /// The ranked category column; empty when the result is the defined
    /// empty value of a precondition short-circuit.
    pub column: String,
    pub entries: Vec<FrequencyEntry>,
}

impl FrequencyResult {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One (value, secondary value, count) entry of a cross-tabulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossTabEntry {
    pub value: String,
    pub secondary: String,
    pub count: u64,
}

/// A category x secondary-category cross-tab, descending by count with
/// first-encounter tie-break over the pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossTabResult {
    pub column: String,
    pub secondary_column: String,
    pub entries: Vec<CrossTabEntry>,
}

impl CrossTabResult {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Per-grouping-key tallies with the decomposed key fields attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyCountsRow {
    pub key: String,
    #[serde(flatten)]
    pub parts: KeyParts,
    #[serde(flatten)]
    pub counts: ConfusionCounts,
    pub total: u64,
}

/// Per-grouping-key derived ratios with the decomposed key fields attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyMetricsRow {
    pub key: String,
    #[serde(flatten)]
    pub parts: KeyParts,
    #[serde(flatten)]
    pub metrics: ConfusionMetrics,
}

/// Per-source tallies for the aggregate pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceCountsRow {
    pub source_name: String,
    #[serde(flatten)]
    pub counts: ConfusionCounts,
    pub total: u64,
}

/// Per-source derived ratios for the aggregate pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceMetricsRow {
    pub source_name: String,
    #[serde(flatten)]
    pub metrics: ConfusionMetrics,
}

/// The aggregate counts table: one row per provenance source plus the
/// grand total spanning every row regardless of partition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceCountsTable {
    pub rows: Vec<SourceCountsRow>,
    pub total: ConfusionCounts,
}

/// The aggregate metrics table, mirroring [`SourceCountsTable`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceMetricsTable {
    pub rows: Vec<SourceMetricsRow>,
    pub total: ConfusionMetrics,
}

/// A grouping key that failed three-segment decomposition. The key's rows
/// are excluded from the per-key tables; other keys are unaffected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MalformedKey {
    pub key: String,
    pub detail: String,
}
