//! Workbook discovery and sheet reading.
//!
//! Every sheet of a workbook is read eagerly into a [`RawSheet`] and the file
//! handle is released before the caller starts normalizing. The first row of a
//! sheet's used range is its header row.

use std::path::Path;

use anyhow::{Context, Result};
use calamine::{Data, Reader, open_workbook_auto};
use log::{debug, warn};

use crate::data::{Cell, Table, format_number};

/// One sheet as read from disk, before any normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSheet {
    pub name: String,
    pub table: Table,
}

pub fn cell_text(cell: &Data) -> Cell {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) if s.is_empty() => None,
        Data::String(s) => Some(s.clone()),
        Data::Float(f) => Some(format_number(*f)),
        Data::Int(i) => Some(i.to_string()),
        Data::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

/// Builds a raw table from sheet rows: first row is the header row, blank
/// header cells become `column_<n>`, blank data rows are dropped and short rows
/// are padded.
pub fn table_from_rows<'a, I>(rows: I) -> Table
where
    I: IntoIterator<Item = &'a [Data]>,
{
    let mut rows = rows.into_iter();
    let Some(header_row) = rows.next() else {
        return Table::default();
    };
    let columns = header_row
        .iter()
        .enumerate()
        .map(|(idx, cell)| cell_text(cell).unwrap_or_else(|| format!("column_{}", idx + 1)))
        .collect::<Vec<_>>();
    let width = columns.len();
    let mut table = Table::new(columns);
    for row in rows {
        let mut cells = row.iter().take(width).map(cell_text).collect::<Vec<_>>();
        if cells.iter().all(Option::is_none) {
            continue;
        }
        cells.resize(width, None);
        table.rows.push(cells);
    }
    table
}

/// Reads every sheet of the workbook at `path`. Sheets that fail to load are
/// skipped with a warning; failing to open the workbook itself is an error.
pub fn read_workbook(path: &Path) -> Result<Vec<RawSheet>> {
    let mut workbook =
        open_workbook_auto(path).with_context(|| format!("Opening workbook {path:?}"))?;
    let names = workbook.sheet_names().to_vec();
    let mut sheets = Vec::with_capacity(names.len());
    for name in names {
        match workbook.worksheet_range(&name) {
            Ok(range) => {
                let table = table_from_rows(range.rows());
                debug!(
                    "Read sheet '{name}' from {path:?}: {} column(s), {} row(s)",
                    table.columns.len(),
                    table.len()
                );
                sheets.push(RawSheet { name, table });
            }
            Err(err) => warn!("Skipping sheet '{name}' in {path:?}: {err}"),
        }
    }
    Ok(sheets)
}

/// File name component used for vendor detection; falls back to the full path.
pub fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
