//! Per-sheet normalization pipeline and the unified-table accumulator.
//!
//! Each sheet runs through the same stages in a fixed order:
//!
//! 1. column normalization (canonical headers, vendor rule)
//! 2. academic year from the sheet label
//! 3. course and duration normalization
//! 4. gender and employment derivation
//! 5. composite identity
//! 6. canonical column order
//!
//! Results are pushed into an [`Accumulator`] that the caller owns and finally
//! turns into a [`UnifiedTable`]. Sheets are independent of each other, so the
//! order in which they are pushed only affects row order.

use std::path::{Path, PathBuf};

use log::{debug, error, info, warn};

use crate::{
    columns::{self, UNIQUE_ID, YEAR},
    data::Table,
    derive,
    identity::{self, IdentityError},
    mappings::Mappings,
    values,
    workbook::{self, RawSheet},
    year,
};

#[derive(Debug, Clone)]
pub struct SheetOutcome {
    pub table: Table,
    pub year: Option<String>,
    pub identity: Result<(), IdentityError>,
}

/// Runs the full normalization pipeline on one sheet.
pub fn normalize_sheet(sheet: RawSheet, file_name: &str, mappings: &Mappings) -> SheetOutcome {
    let RawSheet { name, table } = sheet;
    let mut table = columns::standardize_columns(table, file_name, mappings);

    let year = year::extract_year(&name);
    match &year {
        Some(value) => table.fill_column(YEAR, value),
        None => warn!("Could not parse an academic year from sheet '{name}' in {file_name}"),
    }

    values::clean_course_names(&mut table, mappings);
    values::clean_durations(&mut table, mappings);
    derive::extract_gender(&mut table);
    derive::add_employment_status(&mut table);

    let identity = identity::create_unique_identifier(&mut table);
    if let Err(err) = &identity {
        warn!("Sheet '{name}' in {file_name}: {err}");
    }

    let table = identity::reorder_columns(&table);
    debug!("Standardized columns in '{name}': {:?}", table.columns);
    SheetOutcome {
        table,
        year,
        identity,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetSummary {
    pub file: String,
    pub sheet: String,
    pub rows: usize,
    pub year: Option<String>,
    pub has_identity: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedFile {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub sheets: Vec<SheetSummary>,
    pub failed_files: Vec<FailedFile>,
}

impl IngestReport {
    pub fn sheets_without_year(&self) -> usize {
        self.sheets.iter().filter(|s| s.year.is_none()).count()
    }

    pub fn sheets_without_identity(&self) -> usize {
        self.sheets.iter().filter(|s| !s.has_identity).count()
    }

    pub fn total_rows(&self) -> usize {
        self.sheets.iter().map(|s| s.rows).sum()
    }
}

/// Collects normalized sheet tables. Owned by the caller; there is no shared state.
#[derive(Debug, Default)]
pub struct Accumulator {
    tables: Vec<Table>,
    report: IngestReport,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, file: &str, sheet: &str, outcome: SheetOutcome) {
        self.report.sheets.push(SheetSummary {
            file: file.to_string(),
            sheet: sheet.to_string(),
            rows: outcome.table.len(),
            year: outcome.year,
            has_identity: outcome.identity.is_ok(),
        });
        self.tables.push(outcome.table);
    }

    pub fn record_failure(&mut self, path: &Path, reason: String) {
        self.report.failed_files.push(FailedFile {
            path: path.to_path_buf(),
            reason,
        });
    }

    /// Normalizes every sheet of one already-read workbook.
    pub fn ingest_sheets(&mut self, file_name: &str, sheets: Vec<RawSheet>, mappings: &Mappings) {
        for sheet in sheets {
            let sheet_name = sheet.name.clone();
            let outcome = normalize_sheet(sheet, file_name, mappings);
            info!(
                "Read sheet '{sheet_name}' from {file_name} (year: {})",
                outcome.year.as_deref().unwrap_or("unknown")
            );
            self.push(file_name, &sheet_name, outcome);
        }
    }

    pub fn report(&self) -> &IngestReport {
        &self.report
    }

    pub fn finish(self) -> (UnifiedTable, IngestReport) {
        let merged = Table::concat(&self.tables);
        let table = identity::reorder_columns(&merged);
        (UnifiedTable { table }, self.report)
    }
}

/// Reads and normalizes every workbook in `paths`. Workbooks that cannot be
/// opened are logged and recorded in the report; the rest are still processed.
pub fn ingest<P>(paths: &[P], mappings: &Mappings) -> (UnifiedTable, IngestReport)
where
    P: AsRef<Path>,
{
    let mut accumulator = Accumulator::new();
    for path in paths {
        let path = path.as_ref();
        let file_name = workbook::file_label(path);
        match workbook::read_workbook(path) {
            Ok(sheets) => accumulator.ingest_sheets(&file_name, sheets, mappings),
            Err(err) => {
                error!("Error reading {path:?}: {err:#}");
                accumulator.record_failure(path, format!("{err:#}"));
            }
        }
    }
    accumulator.finish()
}

/// The terminal artifact of the pipeline: every sheet's records in canonical
/// column order. Consumers read it; nothing mutates it after assembly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnifiedTable {
    table: Table,
}

impl UnifiedTable {
    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn into_table(self) -> Table {
        self.table
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Records with a parsed `YEAR`; the basis for every year-scoped aggregate.
    pub fn with_known_year(&self) -> Table {
        let mut table = self.table.clone();
        if let Some(idx) = table.column_index(YEAR) {
            table.retain_rows(|row| row[idx].is_some());
        } else {
            table.rows.clear();
        }
        table
    }

    /// Number of records carrying a `UNIQUE_ID`.
    pub fn identified_records(&self) -> usize {
        self.table
            .column_values(UNIQUE_ID)
            .map(|cells| cells.iter().filter(|cell| cell.is_some()).count())
            .unwrap_or(0)
    }
}
