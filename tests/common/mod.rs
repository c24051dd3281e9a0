//! Shared test fixtures for integration tests.
#![allow(dead_code)]

use std::fs;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use tempfile::TempDir;

/// First timestamp of every fixture log.
pub fn start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2016, 2, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("valid fixture date")
}

/// `n` timestamps two minutes apart, starting at [`start`].
pub fn index(n: usize) -> Vec<NaiveDateTime> {
    (0..n as i64)
        .map(|i| start() + TimeDelta::minutes(2 * i))
        .collect()
}

/// Writes one household log with a `time` column followed by `variables`.
///
/// `rows[i]` holds the values for `index[i]`.
pub fn write_household(
    dir: &Path,
    file: &str,
    variables: &[&str],
    index: &[NaiveDateTime],
    rows: &[Vec<f64>],
) {
    let mut text = format!("time,{}\n", variables.join(","));
    for (ts, row) in index.iter().zip(rows) {
        let values: Vec<String> = row.iter().map(f64::to_string).collect();
        text.push_str(&format!(
            "{},{}\n",
            ts.format("%Y-%m-%d %H:%M:%S"),
            values.join(",")
        ));
    }
    fs::write(dir.join(file), text).expect("write fixture");
}

/// Two households over 30 two-minute samples (one hour) with constant
/// power: `house1` at 1000 W, `house2` at 500 W, both with a `Vrms` column.
pub fn two_households() -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    let index = index(30);
    let rows = |power: f64| -> Vec<Vec<f64>> {
        (0..30)
            .map(|i| vec![power, 230.0 + f64::from(i) * 0.1])
            .collect()
    };
    write_household(dir.path(), "house2.csv", &["Power", "Vrms"], &index, &rows(500.0));
    write_household(dir.path(), "house1.csv", &["Power", "Vrms"], &index, &rows(1000.0));
    dir
}
