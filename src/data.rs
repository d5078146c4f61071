//! In-memory tabular model shared by every pipeline stage.
//!
//! A [`Table`] is an ordered list of column names plus rows of optional string
//! cells. `None` marks a missing value: an empty spreadsheet cell, or a column
//! that did not exist in the sheet a row came from once tables are concatenated.
//! Every stage consumes a table and returns a new one; nothing here holds
//! process-wide state.

use std::collections::{HashMap, HashSet};

use serde_json::{Map, Value as JsonValue};

pub type Cell = Option<String>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Builds a table from string literals; empty strings become missing cells.
    pub fn from_literal(columns: &[&str], rows: &[&[&str]]) -> Self {
        let columns = columns.iter().map(|c| c.to_string()).collect::<Vec<_>>();
        let width = columns.len();
        let rows = rows
            .iter()
            .map(|row| {
                (0..width)
                    .map(|idx| {
                        row.get(idx)
                            .filter(|value| !value.is_empty())
                            .map(|value| value.to_string())
                    })
                    .collect()
            })
            .collect();
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn value(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx)?.as_deref()
    }

    /// Returns the cells of `column` in row order, or `None` when the column is absent.
    pub fn column_values(&self, column: &str) -> Option<Vec<Option<&str>>> {
        let idx = self.column_index(column)?;
        Some(
            self.rows
                .iter()
                .map(|row| row.get(idx).and_then(|cell| cell.as_deref()))
                .collect(),
        )
    }

    /// Overwrites `column` when present, otherwise appends it.
    pub fn set_column(&mut self, column: &str, values: Vec<Cell>) {
        debug_assert_eq!(values.len(), self.rows.len());
        match self.column_index(column) {
            Some(idx) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[idx] = value;
                }
            }
            None => {
                self.columns.push(column.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }
    }

    /// Fills (or adds) `column` with the same value in every row.
    pub fn fill_column(&mut self, column: &str, value: &str) {
        let values = vec![Some(value.to_string()); self.rows.len()];
        self.set_column(column, values);
    }

    /// Rewrites every cell of `column` in place. Returns `false` when the column is absent.
    pub fn map_column<F>(&mut self, column: &str, mut f: F) -> bool
    where
        F: FnMut(Option<&str>) -> Cell,
    {
        let Some(idx) = self.column_index(column) else {
            return false;
        };
        for row in &mut self.rows {
            let mapped = f(row[idx].as_deref());
            row[idx] = mapped;
        }
        true
    }

    /// Projects the table onto `order`. Names not present in the table are ignored.
    pub fn select_columns(&self, order: &[String]) -> Table {
        let indices = order
            .iter()
            .filter_map(|name| self.column_index(name))
            .collect::<Vec<_>>();
        self.select_indices(&indices)
    }

    /// Projects the table onto column positions, so repeated names are kept apart.
    pub fn select_indices(&self, indices: &[usize]) -> Table {
        Table {
            columns: indices.iter().map(|&idx| self.columns[idx].clone()).collect(),
            rows: self
                .rows
                .iter()
                .map(|row| indices.iter().map(|&idx| row[idx].clone()).collect())
                .collect(),
        }
    }

    /// Renames repeated column names to `<name>_2`, `<name>_3`, ... (skipping
    /// names already in use) and returns each `(original, renamed)` pair.
    pub fn disambiguate_columns(&mut self) -> Vec<(String, String)> {
        let taken = self.columns.iter().cloned().collect::<HashSet<_>>();
        let mut seen: HashSet<String> = HashSet::new();
        let mut renamed = Vec::new();
        for column in &mut self.columns {
            if seen.insert(column.clone()) {
                continue;
            }
            let mut suffix = 2;
            let candidate = loop {
                let candidate = format!("{column}_{suffix}");
                if !taken.contains(&candidate) && !seen.contains(&candidate) {
                    break candidate;
                }
                suffix += 1;
            };
            seen.insert(candidate.clone());
            renamed.push((std::mem::replace(column, candidate.clone()), candidate));
        }
        renamed
    }

    pub fn retain_rows<F>(&mut self, mut keep: F)
    where
        F: FnMut(&[Cell]) -> bool,
    {
        self.rows.retain(|row| keep(row));
    }

    /// Concatenates tables on the union of their columns (first-seen order). A
    /// name repeated inside one table lines up with the same occurrence of that
    /// name in the other tables.
    pub fn concat<'a, I>(tables: I) -> Table
    where
        I: IntoIterator<Item = &'a Table>,
    {
        let tables = tables.into_iter().collect::<Vec<_>>();
        let mut columns: Vec<String> = Vec::new();
        let mut positions: HashMap<(String, usize), usize> = HashMap::new();
        let mut targets_per_table = Vec::with_capacity(tables.len());
        for table in &tables {
            let mut occurrences: HashMap<&str, usize> = HashMap::new();
            let targets = table
                .columns
                .iter()
                .map(|column| {
                    let nth = occurrences.entry(column.as_str()).or_insert(0);
                    let key = (column.clone(), *nth);
                    *nth += 1;
                    *positions.entry(key).or_insert_with(|| {
                        columns.push(column.clone());
                        columns.len() - 1
                    })
                })
                .collect::<Vec<_>>();
            targets_per_table.push(targets);
        }

        let mut rows = Vec::with_capacity(tables.iter().map(|t| t.len()).sum());
        for (table, targets) in tables.iter().zip(&targets_per_table) {
            for row in &table.rows {
                let mut merged = vec![None; columns.len()];
                for (cell, &target) in row.iter().zip(targets) {
                    merged[target] = cell.clone();
                }
                rows.push(merged);
            }
        }
        Table { columns, rows }
    }

    /// Renders rows as strings with missing cells blank, for console and CSV output.
    pub fn display_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|cell| cell.clone().unwrap_or_default()).collect())
            .collect()
    }

    pub fn to_json_records(&self) -> Vec<JsonValue> {
        self.rows
            .iter()
            .map(|row| {
                let mut object = Map::with_capacity(self.columns.len());
                for (column, cell) in self.columns.iter().zip(row) {
                    let value = match cell {
                        Some(text) => JsonValue::String(text.clone()),
                        None => JsonValue::Null,
                    };
                    object.insert(column.clone(), value);
                }
                JsonValue::Object(object)
            })
            .collect()
    }
}

/// Renders a float the way a spreadsheet shows it: integral values lose the `.0`.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}
