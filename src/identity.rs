//! Composite record identity and canonical column order.
//!
//! A missing identity cell joins as an empty segment (`12__S/O Ram_...`), never
//! as a placeholder word.

use thiserror::Error;

use crate::{
    columns::{ADM_NO, CANONICAL_ORDER, COURSE, DURATION, FATHER_HUSBAND, STUDENT, UNIQUE_ID, YEAR},
    data::Table,
};

/// Fields joined (in this order) to form `UNIQUE_ID`.
pub const IDENTITY_COLUMNS: &[&str] = &[ADM_NO, STUDENT, FATHER_HUSBAND, COURSE, DURATION, YEAR];

pub const IDENTITY_SEPARATOR: &str = "_";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("missing columns for unique identifier: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

pub fn missing_identity_columns(table: &Table) -> Vec<String> {
    IDENTITY_COLUMNS
        .iter()
        .filter(|column| !table.has_column(column))
        .map(|column| column.to_string())
        .collect()
}

/// Joins the identity fields of one row. Missing cells contribute an empty segment.
pub fn compose_identity<'a, I>(fields: I) -> String
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    fields
        .into_iter()
        .map(|field| field.unwrap_or_default())
        .collect::<Vec<_>>()
        .join(IDENTITY_SEPARATOR)
}

/// Adds `UNIQUE_ID` to every row. When an identity column is absent the table
/// is left untouched and the missing set is returned.
pub fn create_unique_identifier(table: &mut Table) -> Result<(), IdentityError> {
    let missing = missing_identity_columns(table);
    if !missing.is_empty() {
        return Err(IdentityError::MissingColumns(missing));
    }
    let indices = IDENTITY_COLUMNS
        .iter()
        .filter_map(|column| table.column_index(column))
        .collect::<Vec<_>>();
    let ids = table
        .rows
        .iter()
        .map(|row| {
            Some(compose_identity(
                indices.iter().map(|&idx| row[idx].as_deref()),
            ))
        })
        .collect();
    table.set_column(UNIQUE_ID, ids);
    Ok(())
}

/// Column positions in canonical order: canonical columns first (every
/// occurrence, in table order), then the rest in their original relative order.
pub fn canonical_index_order(columns: &[String]) -> Vec<usize> {
    let mut order = CANONICAL_ORDER
        .iter()
        .flat_map(move |name| {
            columns
                .iter()
                .enumerate()
                .filter(move |(_, column)| column.as_str() == *name)
                .map(|(idx, _)| idx)
        })
        .collect::<Vec<_>>();
    order.extend(
        columns
            .iter()
            .enumerate()
            .filter(|(_, column)| !CANONICAL_ORDER.contains(&column.as_str()))
            .map(|(idx, _)| idx),
    );
    order
}

pub fn canonical_column_order(columns: &[String]) -> Vec<String> {
    canonical_index_order(columns)
        .into_iter()
        .map(|idx| columns[idx].clone())
        .collect()
}

pub fn reorder_columns(table: &Table) -> Table {
    table.select_indices(&canonical_index_order(&table.columns))
}
