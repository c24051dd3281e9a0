//! Load-duration distribution: share of time spent in each power range.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::error::AnalysisError;
use crate::panel::Panel;

use super::write_table;

/// Sample count per bin, keyed by `floor(value / bin_width)`.
pub fn bin_counts(values: &[f64], bin_width: f64) -> BTreeMap<i64, usize> {
    let mut counts = BTreeMap::new();
    for v in values {
        *counts.entry((v / bin_width).floor() as i64).or_insert(0) += 1;
    }
    counts
}

/// Per-entity percentage of samples in each power bin.
///
/// Bins are the union over all entities; an entity with no samples in a
/// bin gets 0. `percent[b][e]` is the share of `entities[e]` samples that
/// fall in `bins[b]`, and every entity column sums to 100.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadDuration {
    pub variable: String,
    pub bin_width: f64,
    pub entities: Vec<String>,
    /// Bin ids in ascending order; the bin covers
    /// `[id * bin_width, (id + 1) * bin_width)`.
    pub bins: Vec<i64>,
    pub percent: Vec<Vec<f64>>,
}

impl LoadDuration {
    /// Bins the power slice of every entity and normalizes to percentages.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InvalidParameter`] for a non-positive or
    /// non-finite `bin_width` and [`AnalysisError::UnknownVariable`] if the
    /// panel has no `power_variable`.
    pub fn from_panel(
        panel: &Panel,
        power_variable: &str,
        bin_width: f64,
    ) -> Result<Self, AnalysisError> {
        if !(bin_width.is_finite() && bin_width > 0.0) {
            return Err(AnalysisError::InvalidParameter {
                name: "bin width",
                reason: format!("must be a positive number of watts, got {bin_width}"),
            });
        }
        let power = panel
            .variable(power_variable)
            .ok_or_else(|| AnalysisError::UnknownVariable(power_variable.to_string()))?;

        let per_entity: Vec<(BTreeMap<i64, usize>, usize)> = power
            .iter()
            .map(|(entity, column)| {
                let counts = bin_counts(column, bin_width);
                debug!(entity, bins = counts.len(), "binned power samples");
                (counts, column.len())
            })
            .collect();

        let bins: Vec<i64> = per_entity
            .iter()
            .flat_map(|(counts, _)| counts.keys().copied())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let percent = bins
            .iter()
            .map(|bin| {
                per_entity
                    .iter()
                    .map(|(counts, total)| {
                        let count = counts.get(bin).copied().unwrap_or(0);
                        if *total == 0 {
                            0.0
                        } else {
                            count as f64 * 100.0 / *total as f64
                        }
                    })
                    .collect()
            })
            .collect();

        Ok(Self {
            variable: power_variable.to_string(),
            bin_width,
            entities: panel.entities().to_vec(),
            bins,
            percent,
        })
    }

    /// Lower edge of each bin in watts.
    pub fn bin_edges(&self) -> Vec<f64> {
        self.bins
            .iter()
            .map(|&b| b as f64 * self.bin_width)
            .collect()
    }

    /// Percentages of one entity across all bins.
    pub fn column(&self, entity: &str) -> Option<Vec<f64>> {
        let e = self.entities.iter().position(|x| x == entity)?;
        Some(self.percent.iter().map(|row| row[e]).collect())
    }
}

impl fmt::Display for LoadDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows: Vec<(String, &[f64])> = self
            .bin_edges()
            .into_iter()
            .map(|edge| format!("{edge}"))
            .zip(self.percent.iter().map(Vec::as_slice))
            .collect();
        let title = format!(
            "Load duration of {} (% of time, {} W bins)",
            self.variable, self.bin_width
        );
        write_table(f, &title, "bin [W]", &self.entities, &rows, 2)
    }
}
