//! Compound categorical filtering over a merged table.

use tracing::warn;

use verif_ingest::MergedTable;
use verif_model::{GroupingKeySelection, SetFilter};

/// A read-only view over the rows of a [`MergedTable`] that passed the
/// filter conjunction. The underlying table is never copied or mutated.
#[derive(Debug, Clone)]
pub struct FilteredTable<'a> {
    table: &'a MergedTable,
    rows: Vec<usize>,
}

impl<'a> FilteredTable<'a> {
    pub fn empty(table: &'a MergedTable) -> Self {
        Self {
            table,
            rows: Vec::new(),
        }
    }

    pub fn table(&self) -> &'a MergedTable {
        self.table
    }

    /// Indices into the merged table, in merged-row order.
    pub fn row_indices(&self) -> &[usize] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Applies the selection's filter conjunction and returns the passing rows
/// as a view.
///
/// Short-circuits to the empty view (a defined result, not an error) when
/// the table is empty, no outcomes are selected, or the outcome column is
/// missing. The conjunction applies in fixed order: outcome membership,
/// then the key filter, then the type filter. [`SetFilter::All`] skips a
/// stage entirely; an unknown key/type column skips only that stage, while
/// the outcome stage is mandatory. Absent cells never match a membership
/// predicate.
pub fn filter<'a>(table: &'a MergedTable, selection: &GroupingKeySelection) -> FilteredTable<'a> {
    if table.is_empty() || selection.selected_outcomes.is_empty() {
        return FilteredTable::empty(table);
    }
    let Some(outcomes) = table.column_strings(&selection.outcome_column) else {
        warn!(
            column = %selection.outcome_column,
            "outcome column missing from merged table; filter result is empty"
        );
        return FilteredTable::empty(table);
    };

    let key_stage = membership_stage(table, &selection.key_column, &selection.key_filter);
    let type_stage = membership_stage(table, &selection.type_column, &selection.type_filter);

    let mut rows = Vec::new();
    for (idx, outcome) in outcomes.iter().enumerate() {
        let outcome_matches = outcome
            .as_deref()
            .is_some_and(|value| selection.selected_outcomes.contains(value));
        if !outcome_matches {
            continue;
        }
        if !stage_matches(&key_stage, idx) {
            continue;
        }
        if !stage_matches(&type_stage, idx) {
            continue;
        }
        rows.push(idx);
    }
    FilteredTable { table, rows }
}

/// A prepared key/type stage: `None` means the stage is skipped, either
/// because the filter is the `All` sentinel or because the column does not
/// exist in the table.
type Stage<'s> = Option<(Vec<Option<String>>, &'s SetFilter)>;

fn membership_stage<'s>(
    table: &MergedTable,
    column: &str,
    set_filter: &'s SetFilter,
) -> Stage<'s> {
    if matches!(set_filter, SetFilter::All) {
        return None;
    }
    match table.column_strings(column) {
        Some(values) => Some((values, set_filter)),
        None => {
            warn!(%column, "filter column missing from merged table; stage skipped");
            None
        }
    }
}

fn stage_matches(stage: &Stage<'_>, idx: usize) -> bool {
    match stage {
        None => true,
        Some((values, set_filter)) => values
            .get(idx)
            .and_then(Option::as_deref)
            .is_some_and(|value| set_filter.matches(value)),
    }
}

/// Distinct non-blank values of a column in first-encounter order, for
/// populating filter options. Unknown columns yield an empty list.
pub fn distinct_values(table: &MergedTable, column: &str) -> Vec<String> {
    let Some(values) = table.column_strings(column) else {
        return Vec::new();
    };
    let mut seen = std::collections::HashSet::new();
    let mut distinct = Vec::new();
    for value in values.into_iter().flatten() {
        if value.is_empty() {
            continue;
        }
        if seen.insert(value.clone()) {
            distinct.push(value);
        }
    }
    distinct
}
