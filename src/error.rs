//! Error types for loading, aligning, deriving, and rendering.

use std::io;
use std::path::PathBuf;

use chrono::NaiveDateTime;

/// Failures while discovering or parsing the per-household input files.
#[derive(thiserror::Error, Debug)]
pub enum InputError {
    #[error("cannot read input directory \"{}\": {source}", .dir.display())]
    ReadDir {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("input directory \"{}\" contains no files", .dir.display())]
    NoFiles { dir: PathBuf },
    #[error("cannot read \"{}\": {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("\"{}\" has no usable file name to derive an entity key from", .path.display())]
    NoEntityKey { path: PathBuf },
    #[error("\"{}\" and \"{}\" both map to entity `{key}`", .first.display(), .second.display())]
    DuplicateEntity {
        key: String,
        first: PathBuf,
        second: PathBuf,
    },
    #[error("\"{}\": header must name an index column and at least one variable", .path.display())]
    MissingVariables { path: PathBuf },
    #[error("\"{}\": variable `{name}` appears more than once in the header", .path.display())]
    DuplicateColumn { path: PathBuf, name: String },
    #[error("\"{}\" line {line}: cannot parse timestamp \"{value}\"", .path.display())]
    BadTimestamp {
        path: PathBuf,
        line: u64,
        value: String,
    },
    #[error("\"{}\" line {line}: column `{column}` has non-numeric value \"{value}\"", .path.display())]
    BadNumber {
        path: PathBuf,
        line: u64,
        column: String,
        value: String,
    },
    #[error("\"{}\" line {line}: timestamp {current} does not follow {previous}", .path.display())]
    UnorderedIndex {
        path: PathBuf,
        line: u64,
        previous: NaiveDateTime,
        current: NaiveDateTime,
    },
}

/// Disagreement between entities that prevents building a panel.
///
/// Every variant that compares two entities names the reference entity
/// (the first one in key order) and the one that diverges from it.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum AlignmentError {
    #[error("no entities to align")]
    NoEntities,
    #[error("entity `{entity}` has an empty table")]
    EmptyTable { entity: String },
    #[error("entity `{entity}` appears more than once")]
    DuplicateEntity { entity: String },
    #[error("entity `{entity}` names {variables} variables but has {columns} columns")]
    ColumnCount {
        entity: String,
        variables: usize,
        columns: usize,
    },
    #[error("entity `{entity}` column `{variable}` has {found} values for {expected} timestamps")]
    ColumnLength {
        entity: String,
        variable: String,
        expected: usize,
        found: usize,
    },
    #[error("entity `{entity}` time index is not strictly increasing at row {position}")]
    UnorderedIndex { entity: String, position: usize },
    #[error(
        "entity `{entity}` has {found} timestamps but `{reference}` has {expected}"
    )]
    IndexLength {
        reference: String,
        entity: String,
        expected: usize,
        found: usize,
    },
    #[error(
        "entity `{entity}` diverges from `{reference}` at row {position}: {found} != {expected}"
    )]
    IndexValue {
        reference: String,
        entity: String,
        position: usize,
        expected: NaiveDateTime,
        found: NaiveDateTime,
    },
    #[error(
        "entity `{entity}` has variables [{}] but `{reference}` has [{}]",
        .found.join(", "),
        .expected.join(", ")
    )]
    Variables {
        reference: String,
        entity: String,
        expected: Vec<String>,
        found: Vec<String>,
    },
    #[error("slice `{variable}` for entity `{entity}` has {found} values, expected {expected}")]
    SliceShape {
        variable: String,
        entity: String,
        expected: usize,
        found: usize,
    },
    #[error("slice `{variable}` has {found} entity columns, expected {expected}")]
    SliceEntities {
        variable: String,
        expected: usize,
        found: usize,
    },
}

/// Attempt to add a variable the panel already holds.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("variable `{variable}` is already present in the panel")]
pub struct DuplicateVariableError {
    pub variable: String,
}

/// Any failure of the analysis pipeline.
#[derive(thiserror::Error, Debug)]
pub enum AnalysisError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Alignment(#[from] AlignmentError),
    #[error(transparent)]
    DuplicateVariable(#[from] DuplicateVariableError),
    #[error("variable `{0}` is not present in the panel")]
    UnknownVariable(String),
    #[error("invalid {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Rejection of [`Panel::add_variable`](crate::panel::Panel::add_variable).
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum PanelWriteError {
    #[error(transparent)]
    Duplicate(#[from] DuplicateVariableError),
    #[error(transparent)]
    Shape(#[from] AlignmentError),
}

impl From<PanelWriteError> for AnalysisError {
    fn from(err: PanelWriteError) -> Self {
        match err {
            PanelWriteError::Duplicate(e) => e.into(),
            PanelWriteError::Shape(e) => e.into(),
        }
    }
}

/// Chart rendering failures.
#[derive(thiserror::Error, Debug)]
pub enum ChartError {
    #[error("cannot create chart directory \"{}\": {source}", .dir.display())]
    Io {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to draw \"{}\": {message}", .path.display())]
    Draw { path: PathBuf, message: String },
    #[error("nothing to plot for \"{}\"", .path.display())]
    Empty { path: PathBuf },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alignment_error_names_both_entities() {
        let err = AlignmentError::IndexLength {
            reference: "house1".into(),
            entity: "house2".into(),
            expected: 10,
            found: 9,
        };
        let msg = err.to_string();
        assert!(msg.contains("house1"));
        assert!(msg.contains("house2"));
    }

    #[test]
    fn variables_error_lists_names() {
        let err = AlignmentError::Variables {
            reference: "a".into(),
            entity: "b".into(),
            expected: vec!["Power".into(), "Vrms".into()],
            found: vec!["Power".into()],
        };
        assert_eq!(
            err.to_string(),
            "entity `b` has variables [Power] but `a` has [Power, Vrms]"
        );
    }

    #[test]
    fn analysis_error_is_transparent() {
        let err: AnalysisError = DuplicateVariableError {
            variable: "Energy".into(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "variable `Energy` is already present in the panel"
        );
    }
}
