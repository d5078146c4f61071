//! Course and duration value normalizers.
//!
//! Both are lossy-tolerant: a value found in the lookup table becomes its
//! canonical form, anything else is kept (trimmed) so new categories stay
//! visible. Missing cells stay missing.

use crate::{
    columns::{COURSE, DURATION},
    data::{Cell, Table},
    mappings::{LookupTable, Mappings},
};

pub fn normalize_value(raw: &str, table: &LookupTable) -> String {
    match table.lookup(raw) {
        Some(canonical) => canonical.to_string(),
        None => raw.trim().to_string(),
    }
}

fn normalize_cell(cell: Option<&str>, table: &LookupTable) -> Cell {
    cell.map(|raw| normalize_value(raw, table))
}

pub fn normalize_course(raw: &str, mappings: &Mappings) -> String {
    normalize_value(raw, &mappings.courses)
}

pub fn normalize_duration(raw: &str, mappings: &Mappings) -> String {
    normalize_value(raw, &mappings.durations)
}

/// Normalizes the `COURSE` column in place. Returns `false` when the column is absent.
pub fn clean_course_names(table: &mut Table, mappings: &Mappings) -> bool {
    table.map_column(COURSE, |cell| normalize_cell(cell, &mappings.courses))
}

/// Normalizes the `DURATION` column in place. Returns `false` when the column is absent.
pub fn clean_durations(table: &mut Table, mappings: &Mappings) -> bool {
    table.map_column(DURATION, |cell| normalize_cell(cell, &mappings.durations))
}
