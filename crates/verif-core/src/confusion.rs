//! Confusion-matrix statistics per grouping key, per source, and overall.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use verif_ingest::{MergedTable, SOURCE_COLUMN};
use verif_model::{
    ConfusionCounts, ConfusionMetrics, GroupingKeySelection, KeyCountsRow, KeyMetricsRow, KeyParts,
    MalformedKey, SourceCountsRow, SourceCountsTable, SourceMetricsRow, SourceMetricsTable,
};

/// The four tabular outputs of one confusion-statistics request, plus the
/// keys that failed decomposition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfusionStats {
    /// Per-grouping-key tallies, sorted by key.
    pub key_counts: Vec<KeyCountsRow>,
    /// Per-grouping-key ratios, sorted by key.
    pub key_metrics: Vec<KeyMetricsRow>,
    /// Per-source tallies plus the grand total.
    pub source_counts: SourceCountsTable,
    /// Per-source ratios plus the grand total.
    pub source_metrics: SourceMetricsTable,
    /// Keys excluded from the per-key tables, each with its value-shape
    /// error; other keys are unaffected.
    pub malformed_keys: Vec<MalformedKey>,
}

/// Computes confusion statistics over the merged table.
///
/// Returns `None` when the table is empty or when the outcome or provenance
/// column is missing — the defined "not computable" result, not an error.
///
/// The per-key pass partitions rows by the grouping-key column and tallies
/// the four literal outcome labels; any other outcome value is ignored.
/// Rows with an absent or blank key are skipped here but still count toward
/// the per-source and grand-total passes. Each key must decompose into
/// `<name>_<year>_<type>`; keys that do not are reported in
/// [`ConfusionStats::malformed_keys`] and excluded, without aborting the
/// rest. The aggregate pass repeats the tally partitioned by provenance and
/// once more collapsed over all rows. Zero denominators always surface as
/// the undefined marker.
pub fn compute(table: &MergedTable, selection: &GroupingKeySelection) -> Option<ConfusionStats> {
    if table.is_empty() {
        return None;
    }
    let Some(outcomes) = table.column_strings(&selection.outcome_column) else {
        warn!(
            column = %selection.outcome_column,
            "outcome column missing from merged table; statistics not computable"
        );
        return None;
    };
    let Some(sources) = table.column_strings(SOURCE_COLUMN) else {
        warn!(
            column = SOURCE_COLUMN,
            "provenance column missing from merged table; statistics not computable"
        );
        return None;
    };

    // Per-key pass.
    let mut per_key: BTreeMap<String, ConfusionCounts> = BTreeMap::new();
    match table.column_strings(&selection.key_column) {
        Some(keys) => {
            for (idx, key) in keys.iter().enumerate() {
                let Some(key) = key.as_deref().filter(|key| !key.is_empty()) else {
                    continue;
                };
                let entry = per_key.entry(key.to_string()).or_default();
                if let Some(outcome) = outcomes.get(idx).and_then(Option::as_deref) {
                    entry.record(outcome);
                }
            }
        }
        None => {
            warn!(
                column = %selection.key_column,
                "grouping-key column missing from merged table; per-key tables are empty"
            );
        }
    }

    let mut key_counts = Vec::with_capacity(per_key.len());
    let mut key_metrics = Vec::with_capacity(per_key.len());
    let mut malformed_keys = Vec::new();
    for (key, counts) in &per_key {
        match KeyParts::parse(key) {
            Ok(parts) => {
                key_counts.push(KeyCountsRow {
                    key: key.clone(),
                    parts: parts.clone(),
                    counts: *counts,
                    total: counts.total(),
                });
                key_metrics.push(KeyMetricsRow {
                    key: key.clone(),
                    parts,
                    metrics: ConfusionMetrics::from_counts(counts),
                });
            }
            Err(error) => {
                warn!(key = %key, %error, "grouping key excluded from per-key statistics");
                malformed_keys.push(MalformedKey {
                    key: key.clone(),
                    detail: error.to_string(),
                });
            }
        }
    }

    // Aggregate pass: per provenance source, then collapsed over all rows.
    let mut per_source: BTreeMap<String, ConfusionCounts> = BTreeMap::new();
    let mut grand_total = ConfusionCounts::default();
    for (idx, outcome) in outcomes.iter().enumerate() {
        let Some(outcome) = outcome.as_deref() else {
            continue;
        };
        grand_total.record(outcome);
        if let Some(source) = sources.get(idx).and_then(Option::as_deref) {
            per_source.entry(source.to_string()).or_default().record(outcome);
        }
    }

    let source_rows: Vec<SourceCountsRow> = per_source
        .iter()
        .map(|(source_name, counts)| SourceCountsRow {
            source_name: source_name.clone(),
            counts: *counts,
            total: counts.total(),
        })
        .collect();
    let metric_rows: Vec<SourceMetricsRow> = per_source
        .iter()
        .map(|(source_name, counts)| SourceMetricsRow {
            source_name: source_name.clone(),
            metrics: ConfusionMetrics::from_counts(counts),
        })
        .collect();

    Some(ConfusionStats {
        key_counts,
        key_metrics,
        source_counts: SourceCountsTable {
            rows: source_rows,
            total: grand_total,
        },
        source_metrics: SourceMetricsTable {
            rows: metric_rows,
            total: ConfusionMetrics::from_counts(&grand_total),
        },
        malformed_keys,
    })
}
