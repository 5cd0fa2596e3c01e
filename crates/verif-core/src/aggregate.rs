//! Frequency ranking and cross-tabulation over filtered rows.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use verif_model::{
    CrossTabEntry, CrossTabResult, FrequencyEntry, FrequencyResult, GroupingKeySelection,
};

use crate::filter::FilteredTable;

/// The three tables produced by one aggregation request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupedAnalysis {
    /// Top-N ranking of the category column.
    pub top: FrequencyResult,
    /// The same ranking, untruncated (the detail view).
    pub full: FrequencyResult,
    /// Category x secondary-category cross-tabulation.
    pub cross_tab: CrossTabResult,
}

impl GroupedAnalysis {
    pub fn is_empty(&self) -> bool {
        self.top.is_empty() && self.full.is_empty() && self.cross_tab.is_empty()
    }
}

/// Ranks the category column over the filtered rows and cross-tabulates it
/// against the secondary column.
///
/// Returns the defined all-empty result when the filtered view is empty,
/// no category column is selected, or the secondary column is unset or
/// missing from the table; the cross-tab requires the secondary column,
/// and its absence empties all three outputs.
///
/// Counting groups rows by distinct rendered value; absent and blank cells
/// are excluded. Ordering is descending by count with ties broken by
/// first-encounter order — the sort is stable, so equal counts keep the
/// order in which their values first appeared in the rows. The ranking is
/// truncated to `top_n`, silently clamped to at least 1; re-running with
/// identical inputs yields identical results.
pub fn group(filtered: &FilteredTable<'_>, selection: &GroupingKeySelection) -> GroupedAnalysis {
    let Some(category_column) = selection.category_column.as_deref() else {
        return GroupedAnalysis::default();
    };
    let Some(secondary_column) = selection.secondary_column.as_deref() else {
        return GroupedAnalysis::default();
    };
    let table = filtered.table();
    if filtered.is_empty() || !table.has_column(category_column) {
        return GroupedAnalysis::default();
    }
    let Some(categories) = table.column_strings(category_column) else {
        return GroupedAnalysis::default();
    };
    let Some(secondaries) = table.column_strings(secondary_column) else {
        return GroupedAnalysis::default();
    };

    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, u64> = HashMap::new();
    let mut pair_order: Vec<(String, String)> = Vec::new();
    let mut pair_counts: HashMap<(String, String), u64> = HashMap::new();

    for &idx in filtered.row_indices() {
        let Some(category) = non_blank(&categories, idx) else {
            continue;
        };
        if !counts.contains_key(category) {
            order.push(category.to_string());
        }
        *counts.entry(category.to_string()).or_insert(0) += 1;

        if let Some(secondary) = non_blank(&secondaries, idx) {
            let pair = (category.to_string(), secondary.to_string());
            if !pair_counts.contains_key(&pair) {
                pair_order.push(pair.clone());
            }
            *pair_counts.entry(pair).or_insert(0) += 1;
        }
    }

    let mut entries: Vec<FrequencyEntry> = order
        .into_iter()
        .map(|value| {
            let count = counts.get(&value).copied().unwrap_or(0);
            FrequencyEntry { value, count }
        })
        .collect();
    // Stable sort: ties keep first-encounter order.
    entries.sort_by(|a, b| b.count.cmp(&a.count));

    let mut pair_entries: Vec<CrossTabEntry> = pair_order
        .into_iter()
        .map(|(value, secondary)| {
            let count = pair_counts
                .get(&(value.clone(), secondary.clone()))
                .copied()
                .unwrap_or(0);
            CrossTabEntry {
                value,
                secondary,
                count,
            }
        })
        .collect();
    pair_entries.sort_by(|a, b| b.count.cmp(&a.count));

    let full = FrequencyResult {
        column: category_column.to_string(),
        entries: entries.clone(),
    };
    let top_n = selection.top_n.max(1);
    let mut top_entries = entries;
    top_entries.truncate(top_n);
    let top = FrequencyResult {
        column: category_column.to_string(),
        entries: top_entries,
    };
    let cross_tab = CrossTabResult {
        column: category_column.to_string(),
        secondary_column: secondary_column.to_string(),
        entries: pair_entries,
    };

    GroupedAnalysis {
        top,
        full,
        cross_tab,
    }
}

fn non_blank(values: &[Option<String>], idx: usize) -> Option<&str> {
    values
        .get(idx)
        .and_then(Option::as_deref)
        .filter(|value| !value.is_empty())
}
