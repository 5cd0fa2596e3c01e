//! End-to-end ingestion of a real `.xlsx` workbook fixture.

use std::fs;
use std::path::PathBuf;

use verif_ingest::catalog::list_sheets;
use verif_ingest::merge::merge;
use verif_ingest::source::{SheetSource, WorkbookSource};
use verif_model::{CellValue, ColumnType};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

#[test]
fn workbook_fixture_catalogs_and_merges() {
    let mut sources: Vec<Box<dyn SheetSource>> =
        vec![Box::new(WorkbookSource::from_path(fixture("semester1.xlsx")))];

    let catalog = list_sheets(&mut sources);
    assert_eq!(catalog.sheets, vec!["Sheet1"]);
    assert!(catalog.warnings.is_empty());

    let outcome = merge(&mut sources, "Sheet1").expect("merge");
    let table = outcome.table;
    assert!(outcome.warnings.is_empty());
    assert_eq!(table.height(), 2);
    assert_eq!(table.data().height(), 2);

    let columns: Vec<&str> = table.columns().iter().map(String::as_str).collect();
    assert_eq!(
        columns,
        vec!["Key", "Verivikasi Pengawas", "Jumlah", "source_name"]
    );

    // Whole floats read back as integral text, so the column is numeric.
    assert_eq!(table.column_type("Jumlah"), Some(ColumnType::Numeric));
    assert_eq!(table.cell(0, "Jumlah"), CellValue::Number(10.0));
    assert_eq!(
        table.cell(0, "Key"),
        CellValue::Text("EMITEN1_2023_LaporanX".to_string())
    );
    assert_eq!(
        table.cell(1, "Verivikasi Pengawas"),
        CellValue::Text("False Negative".to_string())
    );
    assert_eq!(
        table.cell(0, "source_name"),
        CellValue::Text("semester1.xlsx".to_string())
    );
}

#[test]
fn workbook_bytes_behave_like_the_file() {
    let bytes = fs::read(fixture("semester1.xlsx")).expect("read fixture");
    let mut sources: Vec<Box<dyn SheetSource>> =
        vec![Box::new(WorkbookSource::from_bytes("upload.xlsx", bytes))];
    let outcome = merge(&mut sources, "Sheet1").expect("merge");
    assert_eq!(outcome.table.height(), 2);
    assert_eq!(
        outcome.table.cell(0, "source_name"),
        CellValue::Text("upload.xlsx".to_string())
    );
}
