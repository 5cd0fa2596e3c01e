//! Sheet discovery across a collection of sources.

use std::collections::BTreeSet;

use tracing::warn;

use crate::source::SheetSource;
use crate::warning::SourceWarning;

/// The union of sheet names across sources, deterministic-sorted, plus the
/// warnings for sources that could not be opened.
///
/// An empty catalog means "no usable input": the caller must not proceed
/// to a merge.
#[derive(Debug, Clone, Default)]
pub struct SheetCatalog {
    pub sheets: Vec<String>,
    pub warnings: Vec<SourceWarning>,
}

impl SheetCatalog {
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    /// The sheet a caller should offer by default: `preferred` when
    /// present, otherwise the first catalogued sheet.
    pub fn default_sheet<'a>(&'a self, preferred: &'a str) -> Option<&'a str> {
        if self.sheets.iter().any(|sheet| sheet == preferred) {
            return Some(preferred);
        }
        self.sheets.first().map(String::as_str)
    }
}

/// Enumerates the sheets present across `sources`.
///
/// A source that fails to open contributes nothing and produces a
/// recoverable warning naming it; the catalog still carries the union of
/// sheets from the sources that succeeded.
pub fn list_sheets(sources: &mut [Box<dyn SheetSource>]) -> SheetCatalog {
    let mut sheets: BTreeSet<String> = BTreeSet::new();
    let mut warnings = Vec::new();
    for source in sources.iter_mut() {
        let source_name = source.name().to_string();
        match source.sheet_names() {
            Ok(names) => sheets.extend(names),
            Err(error) => {
                warn!(source = %source_name, %error, "source skipped while listing sheets");
                warnings.push(SourceWarning::open_failed(&source_name, &error));
            }
        }
    }
    SheetCatalog {
        sheets: sheets.into_iter().collect(),
        warnings,
    }
}
