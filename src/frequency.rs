//! Distinct-identity aggregation over the unified table.
//!
//! Every count here is the number of distinct `UNIQUE_ID` values in a group,
//! never a plain row count, so a student listed twice in the same sheet is
//! counted once.

use std::{
    cmp::Ordering,
    collections::{BTreeMap, HashSet},
};

use crate::{
    columns::{COURSE, DURATION, EMPLOYMENT_STATUS, GENDER, UNIQUE_ID, YEAR},
    data::Table,
    year::AcademicYear,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupCount {
    pub key: Vec<String>,
    pub count: usize,
}

/// Groups rows by `keys` and counts distinct `UNIQUE_ID`s per group. Rows with a
/// missing key value or no identity are ignored. Groups come back sorted by key.
pub fn count_distinct(table: &Table, keys: &[&str]) -> Vec<GroupCount> {
    let Some(id_idx) = table.column_index(UNIQUE_ID) else {
        return Vec::new();
    };
    let Some(key_indices) = keys
        .iter()
        .map(|key| table.column_index(key))
        .collect::<Option<Vec<_>>>()
    else {
        return Vec::new();
    };

    let mut groups: BTreeMap<Vec<String>, HashSet<&str>> = BTreeMap::new();
    for row in &table.rows {
        let Some(id) = row[id_idx].as_deref() else {
            continue;
        };
        let Some(key) = key_indices
            .iter()
            .map(|&idx| row[idx].clone())
            .collect::<Option<Vec<_>>>()
        else {
            continue;
        };
        groups.entry(key).or_default().insert(id);
    }
    groups
        .into_iter()
        .map(|(key, ids)| GroupCount {
            key,
            count: ids.len(),
        })
        .collect()
}

pub fn compare_academic_years(left: &str, right: &str) -> Ordering {
    match (AcademicYear::parse(left), AcademicYear::parse(right)) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => left.cmp(right),
    }
}

/// Distinct year labels in chronological order; unparseable labels go last.
pub fn academic_year_order(table: &Table) -> Vec<String> {
    let mut years = distinct_values(table, YEAR);
    years.sort_by(|a, b| compare_academic_years(a, b));
    years
}

/// Distinct non-missing values of `column`, sorted.
pub fn distinct_values(table: &Table, column: &str) -> Vec<String> {
    let mut values = table
        .column_values(column)
        .unwrap_or_default()
        .into_iter()
        .flatten()
        .map(str::to_string)
        .collect::<Vec<_>>();
    values.sort();
    values.dedup();
    values
}

pub fn enrollment_by_year(table: &Table) -> Vec<GroupCount> {
    let mut counts = count_distinct(table, &[YEAR]);
    counts.sort_by(|a, b| compare_academic_years(&a.key[0], &b.key[0]));
    counts
}

/// Year × course counts, chronological within each course.
pub fn enrollment_by_year_and_course(table: &Table) -> Vec<GroupCount> {
    let mut counts = count_distinct(table, &[YEAR, COURSE]);
    counts.sort_by(|a, b| {
        a.key[1]
            .cmp(&b.key[1])
            .then_with(|| compare_academic_years(&a.key[0], &b.key[0]))
    });
    counts
}

/// Course × duration counts, most popular first.
pub fn course_popularity_by_duration(table: &Table) -> Vec<GroupCount> {
    let mut counts = count_distinct(table, &[COURSE, DURATION]);
    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));
    counts
}

pub fn gender_by_year(table: &Table) -> Vec<GroupCount> {
    by_year_and(table, GENDER)
}

pub fn employment_by_year(table: &Table) -> Vec<GroupCount> {
    by_year_and(table, EMPLOYMENT_STATUS)
}

fn by_year_and(table: &Table, column: &str) -> Vec<GroupCount> {
    let mut counts = count_distinct(table, &[YEAR, column]);
    counts.sort_by(|a, b| {
        compare_academic_years(&a.key[0], &b.key[0]).then_with(|| a.key[1].cmp(&b.key[1]))
    });
    counts
}

/// Looks up the count for an exact key, zero when the group is absent.
pub fn count_for(counts: &[GroupCount], key: &[&str]) -> usize {
    counts
        .iter()
        .find(|group| group.key.iter().map(String::as_str).eq(key.iter().copied()))
        .map_or(0, |group| group.count)
}
