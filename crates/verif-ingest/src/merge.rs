//! Column-union merge of one named sheet across sources.

use std::collections::{BTreeMap, HashMap, HashSet};

use anyhow::{Context, Result};
use polars::prelude::{DataFrame, NamedFrom, Series};
use tracing::warn;

use verif_model::ColumnType;

use crate::source::{RawSheet, SheetSource};
use crate::table::{MergedTable, SOURCE_COLUMN, column_strings_of};
use crate::warning::SourceWarning;

/// The result of a merge: the (possibly empty) table plus every recoverable
/// condition encountered along the way.
#[derive(Debug)]
pub struct MergeOutcome {
    pub table: MergedTable,
    pub warnings: Vec<SourceWarning>,
}

/// Reads `sheet_name` from every source and concatenates the rows under
/// column union.
///
/// Sources that cannot be opened, lack the sheet, or fail to read are
/// skipped with an attributable warning; they never abort the merge. The
/// result's columns are the union of every contributing sheet's columns in
/// source-encounter order, with the reserved provenance column appended
/// last; rows from a sheet lacking some column carry the absent marker for
/// it. Row order is the stable concatenation of sources in input order.
///
/// Mixed-type columns promote to text: cells are stored as their canonical
/// string rendering, and a column is declared `Numeric` only when every
/// observed non-blank value parses as a number across all sources.
///
/// The returned table is empty when no source contributed a sheet.
pub fn merge(sources: &mut [Box<dyn SheetSource>], sheet_name: &str) -> Result<MergeOutcome> {
    let mut warnings = Vec::new();
    let mut collected: Vec<(String, RawSheet)> = Vec::new();

    for source in sources.iter_mut() {
        let source_name = source.name().to_string();
        let names = match source.sheet_names() {
            Ok(names) => names,
            Err(error) => {
                warn!(source = %source_name, %error, "skipping source: cannot enumerate sheets");
                warnings.push(SourceWarning::open_failed(&source_name, &error));
                continue;
            }
        };
        if !names.iter().any(|name| name == sheet_name) {
            warn!(source = %source_name, sheet = %sheet_name, "skipping source: sheet not present");
            warnings.push(SourceWarning::missing_sheet(&source_name, sheet_name));
            continue;
        }
        match source.read_sheet(sheet_name) {
            Ok(sheet) => collected.push((source_name, sheet)),
            Err(error) => {
                warn!(source = %source_name, sheet = %sheet_name, %error, "skipping source: sheet read failed");
                warnings.push(SourceWarning::read_failed(&source_name, sheet_name, &error));
            }
        }
    }

    if collected.is_empty() {
        return Ok(MergeOutcome {
            table: MergedTable::empty(),
            warnings,
        });
    }

    // Column union in source-encounter order. The provenance name is
    // reserved: a sheet column carrying it is dropped with a warning.
    let mut union: Vec<String> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    for (source_name, sheet) in &collected {
        for header in &sheet.headers {
            if header == SOURCE_COLUMN {
                warn!(source = %source_name, column = SOURCE_COLUMN, "dropping reserved provenance column from source sheet");
                warnings.push(SourceWarning::reserved_column(source_name, SOURCE_COLUMN));
                continue;
            }
            if seen.insert(header.as_str()) {
                union.push(header.clone());
            }
        }
    }

    // Single deterministic-order reduction: sources in input order, rows
    // within a source in source order.
    let mut merged: Option<DataFrame> = None;
    for (source_name, sheet) in &collected {
        let frame = frame_for_source(source_name, sheet, &union)
            .with_context(|| format!("build frame for source {source_name}"))?;
        merged = Some(match merged.take() {
            None => frame,
            Some(mut acc) => {
                acc.vstack_mut(&frame)
                    .with_context(|| format!("concatenate rows from source {source_name}"))?;
                acc
            }
        });
    }
    let data = merged.unwrap_or_default();

    let mut columns = union;
    columns.push(SOURCE_COLUMN.to_string());

    let mut types: BTreeMap<String, ColumnType> = BTreeMap::new();
    for name in &columns {
        let observed = column_strings_of(&data, name).unwrap_or_default();
        types.insert(name.clone(), infer_column_type(&observed));
    }
    // Provenance is always textual, whatever the source names look like.
    types.insert(SOURCE_COLUMN.to_string(), ColumnType::Text);

    Ok(MergeOutcome {
        table: MergedTable::new(data, columns, types),
        warnings,
    })
}

fn frame_for_source(source_name: &str, sheet: &RawSheet, union: &[String]) -> Result<DataFrame> {
    let height = sheet.rows.len();
    let mut positions: HashMap<&str, usize> = HashMap::new();
    for (idx, header) in sheet.headers.iter().enumerate() {
        if header != SOURCE_COLUMN {
            positions.insert(header.as_str(), idx);
        }
    }

    let mut columns = Vec::with_capacity(union.len() + 1);
    for name in union {
        let values: Vec<Option<String>> = match positions.get(name.as_str()) {
            Some(&idx) => sheet
                .rows
                .iter()
                .map(|row| Some(row.get(idx).cloned().unwrap_or_default()))
                .collect(),
            None => vec![None; height],
        };
        columns.push(Series::new(name.as_str().into(), values).into());
    }
    let provenance: Vec<Option<String>> = (0..height).map(|_| Some(source_name.to_string())).collect();
    columns.push(Series::new(SOURCE_COLUMN.into(), provenance).into());

    let frame = DataFrame::new(columns)
        .with_context(|| format!("assemble columns for source {source_name}"))?;
    Ok(frame)
}

/// Declared-type inference over one merged column: `Absent` when nothing
/// was observed, `Numeric` when every observed non-blank value parses as a
/// number, `Text` otherwise (string promotion).
fn infer_column_type(values: &[Option<String>]) -> ColumnType {
    let mut observed = 0usize;
    let mut non_blank = 0usize;
    let mut numeric = 0usize;
    for value in values.iter().flatten() {
        observed += 1;
        let trimmed = value.trim();
        if trimmed.is_empty() {
            continue;
        }
        non_blank += 1;
        if trimmed.parse::<f64>().is_ok() {
            numeric += 1;
        }
    }
    if observed == 0 {
        ColumnType::Absent
    } else if non_blank > 0 && numeric == non_blank {
        ColumnType::Numeric
    } else {
        ColumnType::Text
    }
}
