#![deny(unsafe_code)]

/// A single cell of a merged table.
///
/// `Absent` is a structural marker: the row came from a source whose sheet
/// did not have this column at all. It is distinct from `Text(String::new())`,
/// which means the cell existed in the source and was blank.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum CellValue {
    Number(f64),
    Text(String),
    Absent,
}

impl CellValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

/// The declared type of a merged-table column, derived once at merge time
/// from the observed values (absent markers are ignored).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ColumnType {
    /// Every observed non-blank value parses as a number.
    Numeric,
    /// At least one observed value is textual, or the sources disagree
    /// (string promotion).
    Text,
    /// The column exists in the union but no source contributed a value.
    Absent,
}
