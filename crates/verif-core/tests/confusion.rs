//! Confusion statistics per grouping key, per source, and overall.

use verif_core::confusion::compute;
use verif_ingest::merge::merge;
use verif_ingest::source::{MemorySource, SheetSource};
use verif_ingest::table::MergedTable;
use verif_model::{ConfusionCounts, GroupingKeySelection};

const OUTCOME: &str = "Verivikasi Pengawas";

fn table_from(sources: Vec<MemorySource>) -> MergedTable {
    let mut boxed: Vec<Box<dyn SheetSource>> = sources
        .into_iter()
        .map(|source| Box::new(source) as Box<dyn SheetSource>)
        .collect();
    merge(&mut boxed, "Sheet1").expect("merge").table
}

fn verification_table() -> MergedTable {
    table_from(vec![
        MemorySource::new("semester1.xlsx").with_sheet(
            "Sheet1",
            &["Key", OUTCOME],
            &[
                &["EMITEN1_2023_LaporanX", "True Positive"],
                &["EMITEN1_2023_LaporanX", "True Positive"],
                &["EMITEN1_2023_LaporanX", "False Negative"],
                &["EMITEN2_2023_LaporanY", "True Negative"],
                &["EMITEN2_2023_LaporanY", "False Positive"],
            ],
        ),
        MemorySource::new("semester2.xlsx").with_sheet(
            "Sheet1",
            &["Key", OUTCOME],
            &[
                &["EMITEN1_2023_LaporanX", "True Positive"],
                &["EMITEN2_2023_LaporanY", "Belum Diverifikasi"],
            ],
        ),
    ])
}

#[test]
fn per_key_tallies_decompose_the_key() {
    let stats = compute(&verification_table(), &GroupingKeySelection::default())
        .expect("statistics computable");

    assert_eq!(stats.key_counts.len(), 2);
    let first = &stats.key_counts[0];
    assert_eq!(first.key, "EMITEN1_2023_LaporanX");
    assert_eq!(first.parts.name, "EMITEN1");
    assert_eq!(first.parts.year, "2023");
    assert_eq!(first.parts.kind, "LaporanX");
    assert_eq!(
        first.counts,
        ConfusionCounts {
            true_positive: 3,
            false_negative: 1,
            ..ConfusionCounts::default()
        }
    );
    assert_eq!(first.total, 4);

    let metrics = &stats.key_metrics[0];
    assert_eq!(metrics.key, "EMITEN1_2023_LaporanX");
    assert_eq!(metrics.metrics.accuracy, Some(0.75));
    assert_eq!(metrics.metrics.recall, Some(0.75));
    assert_eq!(metrics.metrics.precision, Some(1.0));
    // No negatives at all for this key: specificity is undefined.
    assert_eq!(metrics.metrics.specificity, None);

    // The unrecognized label is ignored by the tally.
    let second = &stats.key_counts[1];
    assert_eq!(second.key, "EMITEN2_2023_LaporanY");
    assert_eq!(second.total, 2);
}

#[test]
fn aggregate_rows_per_source_plus_grand_total() {
    let stats = compute(&verification_table(), &GroupingKeySelection::default())
        .expect("statistics computable");

    let sources: Vec<&str> = stats
        .source_counts
        .rows
        .iter()
        .map(|row| row.source_name.as_str())
        .collect();
    assert_eq!(sources, vec!["semester1.xlsx", "semester2.xlsx"]);
    assert_eq!(stats.source_counts.rows[0].total, 5);
    assert_eq!(stats.source_counts.rows[1].total, 1);

    assert_eq!(
        stats.source_counts.total,
        ConfusionCounts {
            true_positive: 3,
            true_negative: 1,
            false_positive: 1,
            false_negative: 1,
        }
    );
    assert_eq!(stats.source_counts.total.total(), 6);
    assert_eq!(stats.source_metrics.rows.len(), 2);
    assert_eq!(
        stats.source_metrics.total.accuracy,
        Some(4.0 / 6.0)
    );
}

#[test]
fn malformed_keys_are_reported_without_aborting_the_rest() {
    let table = table_from(vec![MemorySource::new("mixed.xlsx").with_sheet(
        "Sheet1",
        &["Key", OUTCOME],
        &[
            &["EMITEN1_2023_LaporanX", "True Positive"],
            &["EMITEN1_2023", "True Positive"],
            &["EMITEN1_2023", "False Positive"],
        ],
    )]);
    let stats =
        compute(&table, &GroupingKeySelection::default()).expect("statistics computable");

    // The malformed key is excluded from the per-key tables, not silently
    // truncated into wrong fields.
    assert_eq!(stats.key_counts.len(), 1);
    assert_eq!(stats.key_counts[0].key, "EMITEN1_2023_LaporanX");
    assert_eq!(stats.malformed_keys.len(), 1);
    assert_eq!(stats.malformed_keys[0].key, "EMITEN1_2023");
    assert!(stats.malformed_keys[0].detail.contains("segments"));

    // Its rows still count toward the aggregate passes.
    assert_eq!(stats.source_counts.total.total(), 3);
}

#[test]
fn blank_keys_skip_the_per_key_pass_only() {
    let table = table_from(vec![
        MemorySource::new("keyed.xlsx").with_sheet(
            "Sheet1",
            &["Key", OUTCOME],
            &[&["EMITEN1_2023_LaporanX", "True Positive"], &["", "True Negative"]],
        ),
        // No Key column at all: those rows have absent keys.
        MemorySource::new("keyless.xlsx").with_sheet(
            "Sheet1",
            &[OUTCOME],
            &[&["False Positive"]],
        ),
    ]);
    let stats =
        compute(&table, &GroupingKeySelection::default()).expect("statistics computable");

    assert_eq!(stats.key_counts.len(), 1);
    assert_eq!(stats.key_counts[0].total, 1);
    assert_eq!(stats.source_counts.total.total(), 3);
}

#[test]
fn preconditions_return_none() {
    assert!(compute(&MergedTable::empty(), &GroupingKeySelection::default()).is_none());

    let table = table_from(vec![MemorySource::new("no-outcome.xlsx").with_sheet(
        "Sheet1",
        &["Key"],
        &[&["EMITEN1_2023_LaporanX"]],
    )]);
    assert!(compute(&table, &GroupingKeySelection::default()).is_none());
}

#[test]
fn missing_key_column_empties_only_the_per_key_tables() {
    let table = table_from(vec![MemorySource::new("keyless.xlsx").with_sheet(
        "Sheet1",
        &[OUTCOME],
        &[&["True Positive"], &["False Negative"]],
    )]);
    let stats =
        compute(&table, &GroupingKeySelection::default()).expect("statistics computable");
    assert!(stats.key_counts.is_empty());
    assert!(stats.key_metrics.is_empty());
    assert!(stats.malformed_keys.is_empty());
    assert_eq!(stats.source_counts.total.total(), 2);
    assert_eq!(stats.source_metrics.total.recall, Some(0.5));
}
