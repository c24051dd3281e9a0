//! Per-entity source tables produced by the loader.

use chrono::{NaiveDateTime, TimeDelta};

/// A time-indexed table of named numeric columns read from one file.
///
/// Columns are stored variable-major: `columns[v][t]` is the value of
/// `variables[v]` at `index[t]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceTable {
    /// Timestamps of each row, in file order.
    pub index: Vec<NaiveDateTime>,
    /// Variable names from the header, in header order.
    pub variables: Vec<String>,
    /// One column per variable, each `index.len()` long.
    pub columns: Vec<Vec<f64>>,
}

impl SourceTable {
    /// Number of rows.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns `true` when the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Column for a named variable.
    pub fn column(&self, variable: &str) -> Option<&[f64]> {
        self.variables
            .iter()
            .position(|v| v == variable)
            .map(|i| self.columns[i].as_slice())
    }
}

/// One monitored household: a key derived from its file name and its table.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub key: String,
    pub table: SourceTable,
}

impl Entity {
    pub fn new(key: impl Into<String>, table: SourceTable) -> Self {
        Self {
            key: key.into(),
            table,
        }
    }
}

/// Common spacing of a time index, or `None` when spacing is not uniform
/// or the index has fewer than two entries.
pub fn sampling_interval(index: &[NaiveDateTime]) -> Option<TimeDelta> {
    let mut steps = index.windows(2).map(|w| w[1] - w[0]);
    let first = steps.next()?;
    steps.all(|s| s == first).then_some(first)
}
