//! Column classification for consumer/UI use.

use serde::{Deserialize, Serialize};

use verif_ingest::MergedTable;
use verif_model::ColumnType;

/// The merged table's columns partitioned by declared type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnClasses {
    pub numeric: Vec<String>,
    pub categorical: Vec<String>,
}

/// Partitions the table's columns into numeric and categorical sets.
///
/// Purely a pass over the declared column types computed at merge time;
/// deterministic for the same table, no side effects. Columns declared
/// `Absent` (no observed values anywhere) appear in neither list. An empty
/// table yields two empty sequences.
pub fn classify(table: &MergedTable) -> ColumnClasses {
    let mut classes = ColumnClasses::default();
    for name in table.columns() {
        match table.column_type(name) {
            Some(ColumnType::Numeric) => classes.numeric.push(name.clone()),
            Some(ColumnType::Text) => classes.categorical.push(name.clone()),
            Some(ColumnType::Absent) | None => {}
        }
    }
    classes
}
