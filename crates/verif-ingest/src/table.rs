//! The merged table: polars-backed storage with a typed cell surface.

use std::collections::BTreeMap;

use polars::prelude::{AnyValue, DataFrame};

use verif_model::{CellValue, ColumnType};

/// Reserved provenance column. Every merged row carries the name of the
/// source it came from under this column; source sheets may not use it.
pub const SOURCE_COLUMN: &str = "source_name";

/// The unified result of column-union concatenation across sources.
///
/// Storage is a string-typed `DataFrame`: a `null` entry is the absent
/// marker ("this row's source had no such column"), `""` is an observed
/// blank. Declared column types are computed once at merge time and never
/// change; downstream components receive the table by shared reference and
/// operate on views or derived results, never in place.
#[derive(Debug, Clone, Default)]
pub struct MergedTable {
    data: DataFrame,
    columns: Vec<String>,
    types: BTreeMap<String, ColumnType>,
}

impl MergedTable {
    pub(crate) fn new(
        data: DataFrame,
        columns: Vec<String>,
        types: BTreeMap<String, ColumnType>,
    ) -> Self {
        Self {
            data,
            columns,
            types,
        }
    }

    /// The defined empty value: no columns, no rows.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn height(&self) -> usize {
        self.data.height()
    }

    pub fn is_empty(&self) -> bool {
        self.data.height() == 0
    }

    /// Union columns in source-encounter order, provenance last.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// The declared type of a column, `None` for unknown names.
    pub fn column_type(&self, name: &str) -> Option<ColumnType> {
        self.types.get(name).copied()
    }

    pub fn data(&self) -> &DataFrame {
        &self.data
    }

    /// Materializes one column as rendered strings; `None` entries are
    /// absent markers. Returns `None` for an unknown column.
    pub fn column_strings(&self, name: &str) -> Option<Vec<Option<String>>> {
        if !self.types.contains_key(name) {
            return None;
        }
        column_strings_of(&self.data, name)
    }

    /// The typed value of one cell. Unknown columns and out-of-range rows
    /// read as absent rather than erroring; cells of a `Numeric`-declared
    /// column surface as numbers.
    pub fn cell(&self, row: usize, column: &str) -> CellValue {
        let Ok(col) = self.data.column(column) else {
            return CellValue::Absent;
        };
        let value = col.get(row).unwrap_or(AnyValue::Null);
        let rendered = match value {
            AnyValue::Null => return CellValue::Absent,
            AnyValue::String(s) => s.to_string(),
            AnyValue::StringOwned(s) => s.to_string(),
            other => other.to_string(),
        };
        match self.types.get(column) {
            Some(ColumnType::Numeric) if !rendered.is_empty() => match rendered.parse::<f64>() {
                Ok(number) => CellValue::Number(number),
                Err(_) => CellValue::Text(rendered),
            },
            _ => CellValue::Text(rendered),
        }
    }
}

/// Shared extraction used by both the table accessor and the merge-time
/// type inference.
pub(crate) fn column_strings_of(df: &DataFrame, name: &str) -> Option<Vec<Option<String>>> {
    let column = df.column(name).ok()?;
    let mut values = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let value = column.get(idx).unwrap_or(AnyValue::Null);
        values.push(match value {
            AnyValue::Null => None,
            AnyValue::String(s) => Some(s.to_string()),
            AnyValue::StringOwned(s) => Some(s.to_string()),
            other => Some(other.to_string()),
        });
    }
    Some(values)
}
