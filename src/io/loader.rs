//! Source loader: one delimited file per household, one entity per file.
//!
//! Expected layout of each file:
//!
//! ```text
//! Time,Power,Vrms,Irms
//! 2016-02-01 00:00:00,412.3,231.2,1.9
//! 2016-02-01 00:02:00,398.0,231.0,1.8
//! ```
//!
//! The first column is the time index, the remaining header names are the
//! variables. The entity key is the file name with its extension removed.

use std::collections::HashSet;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Trim};
use tracing::{debug, info};

use crate::error::InputError;
use crate::io::timestamp::TimestampParser;
use crate::panel::types::{Entity, SourceTable};

/// Parsing options shared by every file in one load.
#[derive(Debug, Clone)]
pub struct LoaderOptions {
    /// Field delimiter byte.
    pub delimiter: u8,
    /// Only files with this extension are loaded; `None` loads every file.
    pub extension: Option<String>,
    /// Parser for the index column.
    pub timestamps: TimestampParser,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            extension: None,
            timestamps: TimestampParser::auto(),
        }
    }
}

/// Lists the regular files directly inside `dir`, sorted by path.
///
/// # Errors
///
/// Returns [`InputError::ReadDir`] if the directory cannot be listed and
/// [`InputError::NoFiles`] if nothing matches.
pub fn discover_files(dir: &Path, extension: Option<&str>) -> Result<Vec<PathBuf>, InputError> {
    let read_dir_err = |source| InputError::ReadDir {
        dir: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_dir_err)? {
        let path = entry.map_err(read_dir_err)?.path();
        if !path.is_file() {
            continue;
        }
        if let Some(ext) = extension {
            let matches = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(ext));
            if !matches {
                debug!(path = %path.display(), "skipping file with other extension");
                continue;
            }
        }
        files.push(path);
    }

    if files.is_empty() {
        return Err(InputError::NoFiles {
            dir: dir.to_path_buf(),
        });
    }
    files.sort();
    Ok(files)
}

/// Derives the entity key: file base name with its extension removed.
///
/// # Errors
///
/// Returns [`InputError::NoEntityKey`] for paths without a UTF-8 file stem.
pub fn entity_key(path: &Path) -> Result<String, InputError> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| InputError::NoEntityKey {
            path: path.to_path_buf(),
        })
}

/// Reads one file into a [`SourceTable`].
///
/// # Errors
///
/// Returns an [`InputError`] if the file cannot be opened or any row is
/// malformed.
pub fn load_table(path: &Path, options: &LoaderOptions) -> Result<SourceTable, InputError> {
    let file = fs::File::open(path).map_err(|e| InputError::Unreadable {
        path: path.to_path_buf(),
        source: e.into(),
    })?;
    read_table(file, path, options)
}

/// Parses delimited rows from any reader. `path` is only used in errors.
///
/// # Errors
///
/// Returns an [`InputError`] on malformed headers, rows, timestamps, or
/// numbers, and when timestamps are not strictly increasing.
pub fn read_table(
    reader: impl Read,
    path: &Path,
    options: &LoaderOptions,
) -> Result<SourceTable, InputError> {
    let unreadable = |source| InputError::Unreadable {
        path: path.to_path_buf(),
        source,
    };

    let mut rdr = ReaderBuilder::new()
        .delimiter(options.delimiter)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = rdr.headers().map_err(unreadable)?.clone();
    if headers.len() < 2 {
        return Err(InputError::MissingVariables {
            path: path.to_path_buf(),
        });
    }

    let variables: Vec<String> = headers.iter().skip(1).map(str::to_string).collect();
    let mut seen = HashSet::new();
    if let Some(dup) = variables.iter().find(|v| !seen.insert(v.as_str())) {
        return Err(InputError::DuplicateColumn {
            path: path.to_path_buf(),
            name: dup.clone(),
        });
    }

    let mut index = Vec::new();
    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); variables.len()];

    for result in rdr.records() {
        let record = result.map_err(unreadable)?;
        let line = record.position().map_or(0, csv::Position::line);

        let raw_ts = record.get(0).unwrap_or("");
        let ts = options
            .timestamps
            .parse(raw_ts)
            .ok_or_else(|| InputError::BadTimestamp {
                path: path.to_path_buf(),
                line,
                value: raw_ts.to_string(),
            })?;

        if let Some(&previous) = index.last() {
            if ts <= previous {
                return Err(InputError::UnorderedIndex {
                    path: path.to_path_buf(),
                    line,
                    previous,
                    current: ts,
                });
            }
        }
        index.push(ts);

        for (v, column) in columns.iter_mut().enumerate() {
            let raw = record.get(v + 1).unwrap_or("");
            let value = raw
                .parse::<f64>()
                .ok()
                .filter(|x| x.is_finite())
                .ok_or_else(|| InputError::BadNumber {
                    path: path.to_path_buf(),
                    line,
                    column: variables[v].clone(),
                    value: raw.to_string(),
                })?;
            column.push(value);
        }
    }

    Ok(SourceTable {
        index,
        variables,
        columns,
    })
}

/// Loads every file in `dir` as an entity, ordered by entity key.
///
/// # Errors
///
/// Fails on the first file that cannot be discovered, read, or parsed, and
/// when two files map to the same key.
pub fn load_entities(dir: &Path, options: &LoaderOptions) -> Result<Vec<Entity>, InputError> {
    let files = discover_files(dir, options.extension.as_deref())?;

    let mut keyed = Vec::with_capacity(files.len());
    for path in files {
        let key = entity_key(&path)?;
        debug!(entity = %key, path = %path.display(), "discovered input file");
        keyed.push((key, path));
    }
    keyed.sort_by(|a, b| a.0.cmp(&b.0));

    if let Some(pair) = keyed.windows(2).find(|w| w[0].0 == w[1].0) {
        return Err(InputError::DuplicateEntity {
            key: pair[0].0.clone(),
            first: pair[0].1.clone(),
            second: pair[1].1.clone(),
        });
    }

    let mut entities = Vec::with_capacity(keyed.len());
    for (key, path) in keyed {
        let table = load_table(&path, options)?;
        info!(
            entity = %key,
            rows = table.len(),
            variables = table.variables.len(),
            "loaded household log"
        );
        entities.push(Entity::new(key, table));
    }
    Ok(entities)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    const SAMPLE: &str = "\
Time,Power,Vrms,Irms
2016-02-01 00:00:00,100.0,230.0,0.5
2016-02-01 00:02:00,200.0,231.0,0.9
2016-02-01 00:04:00,300.0,229.5,1.3
";

    fn read(text: &str) -> Result<SourceTable, InputError> {
        read_table(text.as_bytes(), Path::new("house1.csv"), &LoaderOptions::default())
    }

    #[test]
    fn reads_index_and_columns() {
        let table = read(SAMPLE).unwrap();
        assert_eq!(table.variables, vec!["Power", "Vrms", "Irms"]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.column("Power"), Some(&[100.0, 200.0, 300.0][..]));
        assert_eq!(table.index[1].minute(), 2);
    }

    #[test]
    fn bad_timestamp_reports_line() {
        let text = "Time,Power\n2016-02-01 00:00:00,1\nyesterday,2\n";
        match read(text) {
            Err(InputError::BadTimestamp { line, value, .. }) => {
                assert_eq!(line, 3);
                assert_eq!(value, "yesterday");
            }
            other => panic!("expected BadTimestamp, got {other:?}"),
        }
    }

    #[test]
    fn bad_number_names_column() {
        let text = "Time,Power,Vrms\n2016-02-01 00:00:00,1,abc\n";
        match read(text) {
            Err(InputError::BadNumber { column, .. }) => assert_eq!(column, "Vrms"),
            other => panic!("expected BadNumber, got {other:?}"),
        }
    }

    #[test]
    fn nan_is_rejected() {
        let text = "Time,Power\n2016-02-01 00:00:00,NaN\n";
        assert!(matches!(read(text), Err(InputError::BadNumber { .. })));
    }

    #[test]
    fn ragged_row_is_unreadable() {
        let text = "Time,Power,Vrms\n2016-02-01 00:00:00,1\n";
        assert!(matches!(read(text), Err(InputError::Unreadable { .. })));
    }

    #[test]
    fn header_without_variables_is_rejected() {
        let text = "Time\n2016-02-01 00:00:00\n";
        assert!(matches!(read(text), Err(InputError::MissingVariables { .. })));
    }

    #[test]
    fn duplicate_header_is_rejected() {
        let text = "Time,Power,Power\n2016-02-01 00:00:00,1,2\n";
        assert!(matches!(read(text), Err(InputError::DuplicateColumn { .. })));
    }

    #[test]
    fn non_increasing_index_is_rejected() {
        let text = "Time,Power\n2016-02-01 00:02:00,1\n2016-02-01 00:00:00,2\n";
        assert!(matches!(read(text), Err(InputError::UnorderedIndex { .. })));
    }

    #[test]
    fn header_only_gives_empty_table() {
        let table = read("Time,Power\n").unwrap();
        assert!(table.is_empty());
        assert_eq!(table.columns, vec![Vec::<f64>::new()]);
    }

    #[test]
    fn semicolon_delimiter() {
        let opts = LoaderOptions {
            delimiter: b';',
            ..LoaderOptions::default()
        };
        let text = "Time;Power\n2016-02-01 00:00:00;42.5\n";
        let table = read_table(text.as_bytes(), Path::new("h.csv"), &opts).unwrap();
        assert_eq!(table.column("Power"), Some(&[42.5][..]));
    }

    #[test]
    fn entity_key_strips_extension() {
        assert_eq!(entity_key(Path::new("raw_data/house1.csv")).unwrap(), "house1");
        assert_eq!(entity_key(Path::new("house2")).unwrap(), "house2");
        assert!(entity_key(Path::new("/")).is_err());
    }
}
