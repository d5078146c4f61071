//! Composite-key uniqueness check over the unified table.

use std::collections::HashMap;

use log::warn;

use crate::{columns::UNIQUE_ID, data::Table, identity};

#[derive(Debug, Clone, PartialEq)]
pub struct UniquenessReport {
    pub total_records: usize,
    /// Records whose composite key occurs more than once (every member counts).
    pub duplicate_records: usize,
    pub unique_records: usize,
    pub uniqueness_percent: f64,
    /// Most frequent duplicated keys, highest count first.
    pub top_duplicates: Vec<(String, usize)>,
}

impl UniquenessReport {
    pub fn is_unique(&self) -> bool {
        self.duplicate_records == 0
    }
}

/// Checks whether the composite identity is unique across the records that
/// carry one. Rows without a `UNIQUE_ID` (sheets with no parseable year or no
/// identity columns) take no part. Returns `None` (with a warning) when no row
/// can carry an identity because an identity column is missing.
pub fn check_uniqueness(table: &Table, top: usize) -> Option<UniquenessReport> {
    let missing = identity::missing_identity_columns(table);
    if !missing.is_empty() {
        warn!("Missing columns: {}", missing.join(", "));
        return None;
    }
    let Some(ids) = table.column_values(UNIQUE_ID) else {
        warn!("Missing columns: {UNIQUE_ID}");
        return None;
    };

    let mut occurrences: HashMap<&str, usize> = HashMap::new();
    for id in ids.into_iter().flatten() {
        *occurrences.entry(id).or_insert(0) += 1;
    }

    let total_records = occurrences.values().sum::<usize>();
    let duplicate_records = occurrences.values().filter(|&&n| n > 1).sum::<usize>();
    let unique_records = total_records - duplicate_records;
    let uniqueness_percent = if total_records == 0 {
        100.0
    } else {
        unique_records as f64 / total_records as f64 * 100.0
    };

    let mut top_duplicates = occurrences
        .into_iter()
        .filter(|(_, n)| *n > 1)
        .map(|(key, n)| (key.to_string(), n))
        .collect::<Vec<_>>();
    top_duplicates.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    top_duplicates.truncate(top);

    Some(UniquenessReport {
        total_records,
        duplicate_records,
        unique_records,
        uniqueness_percent,
        top_duplicates,
    })
}
