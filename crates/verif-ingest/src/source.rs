//! Spreadsheet source containers.
//!
//! A [`SheetSource`] is an opaque, read-only container with a name and a set
//! of named sheets. Workbooks (`.xlsx`) are opened lazily with `calamine`
//! from a path or from in-memory bytes; `.csv` files expose a single sheet
//! named by the file stem; [`MemorySource`] backs tests and embedders.
//!
//! Cells are rendered to canonical strings at read time: whole floats render
//! without a fractional part, blank cells render as the empty string. Within
//! one sheet a short row is padded with empty strings; "absent" only exists
//! after the column-union merge.

use std::io::Cursor;
use std::mem;
use std::path::{Path, PathBuf};

use calamine::{Data, Range, Reader, Xlsx, open_workbook_from_rs};
use csv::ReaderBuilder;

use crate::error::{IngestError, Result};

/// One sheet as read from one source: normalized headers plus rows of
/// rendered cells, padded to the header width.
#[derive(Debug, Clone, Default)]
pub struct RawSheet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawSheet {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Builds a sheet from raw rows: the first row is the header row;
    /// columns with a blank header are dropped; rows whose projected cells
    /// are all blank are skipped.
    pub(crate) fn from_raw_rows(raw_rows: &[Vec<String>]) -> Self {
        let Some((header_row, data_rows)) = raw_rows.split_first() else {
            return Self::default();
        };
        let header_cells: Vec<(usize, String)> = header_row
            .iter()
            .enumerate()
            .filter_map(|(idx, raw)| {
                let header = normalize_header(raw);
                if header.is_empty() {
                    None
                } else {
                    Some((idx, header))
                }
            })
            .collect();
        let headers: Vec<String> = header_cells.iter().map(|(_, h)| h.clone()).collect();
        let mut rows = Vec::new();
        for record in data_rows {
            let cells: Vec<String> = header_cells
                .iter()
                .map(|(idx, _)| record.get(*idx).map(|v| normalize_cell(v)).unwrap_or_default())
                .collect();
            if cells.iter().all(|value| value.is_empty()) {
                continue;
            }
            rows.push(cells);
        }
        Self { headers, rows }
    }
}

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    let mut parts = trimmed.split_whitespace();
    let mut normalized = String::new();
    if let Some(first) = parts.next() {
        normalized.push_str(first);
        for part in parts {
            normalized.push(' ');
            normalized.push_str(part);
        }
    }
    normalized
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Renders a `calamine` cell to its canonical string. Whole floats render
/// without a fractional part; blank and error cells render empty.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_owned(),
        Data::Float(f) => {
            if *f == f.floor() && f.abs() < 1e15 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(_) => String::new(),
        Data::Empty => String::new(),
    }
}

/// An opaque spreadsheet container: a name plus a readable set of named
/// sheets. Sources are read-only; their lifetime is one ingestion call.
pub trait SheetSource {
    fn name(&self) -> &str;

    /// Enumerates the sheets in this source. Failing to open the container
    /// surfaces here; the catalog and merger treat it as recoverable.
    fn sheet_names(&mut self) -> Result<Vec<String>>;

    /// Reads one named sheet into rows.
    fn read_sheet(&mut self, sheet: &str) -> Result<RawSheet>;
}

enum WorkbookInput {
    Path(PathBuf),
    Bytes(Vec<u8>),
    Spent,
}

/// A `.xlsx` workbook, opened lazily on first access and cached for the
/// rest of the ingestion call.
pub struct WorkbookSource {
    name: String,
    input: WorkbookInput,
    workbook: Option<Xlsx<Cursor<Vec<u8>>>>,
}

impl WorkbookSource {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("workbook")
            .to_string();
        Self {
            name,
            input: WorkbookInput::Path(path),
            workbook: None,
        }
    }

    /// Wraps already-uploaded workbook bytes.
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            input: WorkbookInput::Bytes(bytes),
            workbook: None,
        }
    }

    fn opened(&mut self) -> Result<&mut Xlsx<Cursor<Vec<u8>>>> {
        if self.workbook.is_none() {
            let bytes = match mem::replace(&mut self.input, WorkbookInput::Spent) {
                WorkbookInput::Path(path) => {
                    std::fs::read(&path).map_err(|e| IngestError::SourceOpen {
                        src: self.name.clone(),
                        detail: format!("{}: {e}", path.display()),
                    })?
                }
                WorkbookInput::Bytes(bytes) => bytes,
                WorkbookInput::Spent => {
                    return Err(IngestError::SourceOpen {
                        src: self.name.clone(),
                        detail: "workbook previously failed to open".to_string(),
                    });
                }
            };
            let workbook =
                open_workbook_from_rs(Cursor::new(bytes)).map_err(|e: calamine::XlsxError| {
                    IngestError::SourceOpen {
                        src: self.name.clone(),
                        detail: e.to_string(),
                    }
                })?;
            self.workbook = Some(workbook);
        }
        match self.workbook.as_mut() {
            Some(workbook) => Ok(workbook),
            None => Err(IngestError::SourceOpen {
                src: self.name.clone(),
                detail: "workbook unavailable".to_string(),
            }),
        }
    }
}

impl SheetSource for WorkbookSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn sheet_names(&mut self) -> Result<Vec<String>> {
        let workbook = self.opened()?;
        let names: Vec<String> = workbook.sheet_names().clone();
        Ok(names)
    }

    fn read_sheet(&mut self, sheet: &str) -> Result<RawSheet> {
        let source = self.name.clone();
        let workbook = self.opened()?;
        let names: Vec<String> = workbook.sheet_names().clone();
        if !names.iter().any(|name| name == sheet) {
            return Err(IngestError::MissingSheet {
                src: source,
                sheet: sheet.to_string(),
            });
        }
        let range = workbook
            .worksheet_range(sheet)
            .map_err(|e| IngestError::SheetRead {
                src: source,
                sheet: sheet.to_string(),
                detail: e.to_string(),
            })?;
        Ok(range_to_sheet(&range))
    }
}

fn range_to_sheet(range: &Range<Data>) -> RawSheet {
    let raw_rows: Vec<Vec<String>> = range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect();
    RawSheet::from_raw_rows(&raw_rows)
}

enum CsvInput {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

/// A `.csv` file exposed as a single-sheet source. The sheet is named by
/// the file stem, so `findings.csv` contributes a sheet `findings`.
pub struct CsvSource {
    name: String,
    sheet_name: String,
    input: CsvInput,
}

impl CsvSource {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("data.csv")
            .to_string();
        let sheet_name = stem_of(&name);
        Self {
            name,
            sheet_name,
            input: CsvInput::Path(path),
        }
    }

    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let sheet_name = stem_of(&name);
        Self {
            name,
            sheet_name,
            input: CsvInput::Bytes(bytes),
        }
    }

    fn bytes(&self) -> Result<Vec<u8>> {
        match &self.input {
            CsvInput::Path(path) => std::fs::read(path).map_err(|e| IngestError::SourceOpen {
                src: self.name.clone(),
                detail: format!("{}: {e}", path.display()),
            }),
            CsvInput::Bytes(bytes) => Ok(bytes.clone()),
        }
    }
}

fn stem_of(name: &str) -> String {
    Path::new(name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(name)
        .to_string()
}

impl SheetSource for CsvSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn sheet_names(&mut self) -> Result<Vec<String>> {
        if let CsvInput::Path(path) = &self.input {
            if !path.is_file() {
                return Err(IngestError::SourceOpen {
                    src: self.name.clone(),
                    detail: format!("{}: not a readable file", path.display()),
                });
            }
        }
        Ok(vec![self.sheet_name.clone()])
    }

    fn read_sheet(&mut self, sheet: &str) -> Result<RawSheet> {
        if sheet != self.sheet_name {
            return Err(IngestError::MissingSheet {
                src: self.name.clone(),
                sheet: sheet.to_string(),
            });
        }
        let bytes = self.bytes()?;
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(Cursor::new(bytes));
        let mut raw_rows: Vec<Vec<String>> = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| IngestError::SheetRead {
                src: self.name.clone(),
                sheet: sheet.to_string(),
                detail: e.to_string(),
            })?;
            let row: Vec<String> = record.iter().map(|cell| cell.to_string()).collect();
            raw_rows.push(row);
        }
        Ok(RawSheet::from_raw_rows(&raw_rows))
    }
}

/// An in-process source for tests and embedders that already hold rows.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    name: String,
    sheets: Vec<(String, RawSheet)>,
}

impl MemorySource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sheets: Vec::new(),
        }
    }

    pub fn with_sheet(mut self, sheet: impl Into<String>, headers: &[&str], rows: &[&[&str]]) -> Self {
        let headers: Vec<String> = headers.iter().map(|h| (*h).to_string()).collect();
        let rows: Vec<Vec<String>> = rows
            .iter()
            .map(|row| row.iter().map(|cell| (*cell).to_string()).collect())
            .collect();
        self.sheets.push((sheet.into(), RawSheet { headers, rows }));
        self
    }
}

impl SheetSource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn sheet_names(&mut self) -> Result<Vec<String>> {
        Ok(self.sheets.iter().map(|(name, _)| name.clone()).collect())
    }

    fn read_sheet(&mut self, sheet: &str) -> Result<RawSheet> {
        self.sheets
            .iter()
            .find(|(name, _)| name == sheet)
            .map(|(_, data)| data.clone())
            .ok_or_else(|| IngestError::MissingSheet {
                src: self.name.clone(),
                sheet: sheet.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_floats_render_without_fraction() {
        assert_eq!(cell_to_string(&Data::Float(2023.0)), "2023");
        assert_eq!(cell_to_string(&Data::Float(2.5)), "2.5");
        assert_eq!(cell_to_string(&Data::Empty), "");
        assert_eq!(cell_to_string(&Data::String("  padded  ".to_string())), "padded");
    }

    #[test]
    fn header_normalization_collapses_whitespace() {
        assert_eq!(normalize_header("  Verivikasi   Pengawas "), "Verivikasi Pengawas");
        assert_eq!(normalize_header("\u{feff}Key"), "Key");
        assert_eq!(normalize_header("   "), "");
    }

    #[test]
    fn blank_headers_and_blank_rows_are_dropped() {
        let raw = vec![
            vec!["Key".to_string(), String::new(), "Type".to_string()],
            vec!["A_2023_X".to_string(), "ignored".to_string(), "Laporan".to_string()],
            vec![String::new(), String::new(), String::new()],
            vec!["B_2024_Y".to_string()],
        ];
        let sheet = RawSheet::from_raw_rows(&raw);
        assert_eq!(sheet.headers, vec!["Key", "Type"]);
        assert_eq!(sheet.rows.len(), 2);
        // Short rows pad to the header width.
        assert_eq!(sheet.rows[1], vec!["B_2024_Y".to_string(), String::new()]);
    }

    #[test]
    fn csv_source_exposes_one_sheet_named_by_stem() {
        let mut source = CsvSource::from_bytes("findings.csv", b"Key,Type\nA_2023_X,L\n".to_vec());
        assert_eq!(source.sheet_names().unwrap(), vec!["findings"]);
        let sheet = source.read_sheet("findings").unwrap();
        assert_eq!(sheet.headers, vec!["Key", "Type"]);
        assert_eq!(sheet.rows, vec![vec!["A_2023_X".to_string(), "L".to_string()]]);
        assert!(matches!(
            source.read_sheet("other"),
            Err(IngestError::MissingSheet { .. })
        ));
    }

    #[test]
    fn memory_source_round_trips_sheets() {
        let mut source = MemorySource::new("inline")
            .with_sheet("Sheet1", &["Key"], &[&["A_2023_X"]]);
        assert_eq!(source.sheet_names().unwrap(), vec!["Sheet1"]);
        assert_eq!(source.read_sheet("Sheet1").unwrap().rows.len(), 1);
    }
}
