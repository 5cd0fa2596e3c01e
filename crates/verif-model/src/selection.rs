use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Default outcome column carried by supervisory verification workbooks.
pub const DEFAULT_OUTCOME_COLUMN: &str = "Verivikasi Pengawas";
/// Default grouping-key column.
pub const DEFAULT_KEY_COLUMN: &str = "Key";
/// Default type column.
pub const DEFAULT_TYPE_COLUMN: &str = "Type";
/// Sheet the presentation layer falls back to when present.
pub const DEFAULT_SHEET_NAME: &str = "Sheet1";
/// Default ranking bound (UI range is 1-100, enforced by the caller).
pub const DEFAULT_TOP_N: usize = 10;

/// A categorical-membership predicate: either the `All` sentinel (the
/// predicate is skipped, every row passes) or an explicit value set.
///
/// `Values` with an empty set is not the same as `All`: an empty set
/// matches zero rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "values")]
pub enum SetFilter {
    All,
    Values(BTreeSet<String>),
}

impl SetFilter {
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Values(values.into_iter().map(Into::into).collect())
    }

    /// Whether a rendered cell value passes this predicate.
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Self::All => true,
            Self::Values(set) => set.contains(value),
        }
    }
}

impl Default for SetFilter {
    fn default() -> Self {
        Self::All
    }
}

/// Immutable per-request analysis configuration.
///
/// One instance is constructed by the caller per request and passed by
/// reference into the filter, aggregation, and confusion engines; no engine
/// holds cross-call mutable state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupingKeySelection {
    /// Column holding the verification outcome labels.
    pub outcome_column: String,
    /// Outcome values the filter keeps. Empty means "nothing selected":
    /// the filtered result is empty, by design distinct from [`SetFilter::All`].
    pub selected_outcomes: BTreeSet<String>,
    /// Column holding the grouping key.
    pub key_column: String,
    /// Membership filter over the key column.
    pub key_filter: SetFilter,
    /// Column holding the record type.
    pub type_column: String,
    /// Membership filter over the type column.
    pub type_filter: SetFilter,
    /// Category column to rank. `None` short-circuits aggregation to empty.
    pub category_column: Option<String>,
    /// Secondary category column for the cross-tab. Required: aggregation
    /// returns empty results when it is unset or missing from the table.
    pub secondary_column: Option<String>,
    /// Ranking truncation bound; silently clamped to at least 1.
    pub top_n: usize,
}

impl Default for GroupingKeySelection {
    fn default() -> Self {
        Self {
            outcome_column: DEFAULT_OUTCOME_COLUMN.to_string(),
            selected_outcomes: BTreeSet::new(),
            key_column: DEFAULT_KEY_COLUMN.to_string(),
            key_filter: SetFilter::All,
            type_column: DEFAULT_TYPE_COLUMN.to_string(),
            type_filter: SetFilter::All,
            category_column: None,
            secondary_column: None,
            top_n: DEFAULT_TOP_N,
        }
    }
}

impl GroupingKeySelection {
    /// Convenience constructor for the common "outcomes only" request.
    pub fn with_outcomes<I, S>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            selected_outcomes: outcomes.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}
