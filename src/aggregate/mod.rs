//! Read-only reductions over a [`Panel`](crate::panel::Panel).

pub mod hourly;
pub mod load_duration;
pub mod stats;

use std::fmt;

pub use hourly::{HourlyProfile, hourly_means};
pub use load_duration::{LoadDuration, bin_counts};
pub use stats::DescriptiveStats;

/// Writes a titled table with right-aligned numeric cells.
pub(crate) fn write_table(
    f: &mut fmt::Formatter<'_>,
    title: &str,
    row_header: &str,
    columns: &[String],
    rows: &[(String, &[f64])],
    precision: usize,
) -> fmt::Result {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|(_, values)| values.iter().map(|v| format!("{v:.precision$}")).collect())
        .collect();

    let label_width = rows
        .iter()
        .map(|(label, _)| label.len())
        .chain(std::iter::once(row_header.len()))
        .max()
        .unwrap_or(0);
    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, name)| {
            cells
                .iter()
                .filter_map(|row| row.get(i).map(String::len))
                .chain(std::iter::once(name.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    writeln!(f, "{title}")?;
    write!(f, "  {row_header:<label_width$}")?;
    for (name, width) in columns.iter().zip(&widths) {
        write!(f, "  {name:>width$}")?;
    }
    writeln!(f)?;
    for ((label, _), row) in rows.iter().zip(&cells) {
        write!(f, "  {label:<label_width$}")?;
        for (cell, width) in row.iter().zip(&widths) {
            write!(f, "  {cell:>width$}")?;
        }
        writeln!(f)?;
    }
    Ok(())
}
