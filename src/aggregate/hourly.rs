//! Average power per hour of day.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{NaiveDateTime, Timelike};
use serde::Serialize;

use crate::error::AnalysisError;
use crate::panel::Panel;

use super::write_table;

/// Mean of `values` grouped by the hour component (0–23) of `index`.
///
/// Dates are ignored. Hours without samples are absent from the map.
pub fn hourly_means(index: &[NaiveDateTime], values: &[f64]) -> BTreeMap<u32, f64> {
    let mut buckets: BTreeMap<u32, (f64, usize)> = BTreeMap::new();
    for (ts, value) in index.iter().zip(values) {
        let entry = buckets.entry(ts.hour()).or_default();
        entry.0 += value;
        entry.1 += 1;
    }
    buckets
        .into_iter()
        .map(|(hour, (sum, count))| (hour, sum / count as f64))
        .collect()
}

/// Hour-of-day table with one column per entity.
///
/// `means[h][e]` is the mean power of `entities[e]` during `hours[h]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyProfile {
    pub variable: String,
    pub entities: Vec<String>,
    pub hours: Vec<u32>,
    pub means: Vec<Vec<f64>>,
}

impl HourlyProfile {
    /// Groups the power slice of every entity by hour of day.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::UnknownVariable`] if the panel has no
    /// `power_variable`.
    pub fn from_panel(panel: &Panel, power_variable: &str) -> Result<Self, AnalysisError> {
        let power = panel
            .variable(power_variable)
            .ok_or_else(|| AnalysisError::UnknownVariable(power_variable.to_string()))?;

        let per_entity: Vec<BTreeMap<u32, f64>> = power
            .iter()
            .map(|(_, column)| hourly_means(power.time_index(), column))
            .collect();

        // All entities share the index, so their hour sets agree.
        let hours: Vec<u32> = per_entity
            .first()
            .map(|m| m.keys().copied().collect())
            .unwrap_or_default();
        let means = hours
            .iter()
            .map(|h| {
                per_entity
                    .iter()
                    .map(|m| m.get(h).copied().unwrap_or(0.0))
                    .collect()
            })
            .collect();

        Ok(Self {
            variable: power_variable.to_string(),
            entities: panel.entities().to_vec(),
            hours,
            means,
        })
    }

    /// Mean for one `(hour, entity)` cell, `None` when the hour had no samples.
    pub fn mean_at(&self, hour: u32, entity: &str) -> Option<f64> {
        let h = self.hours.iter().position(|&x| x == hour)?;
        let e = self.entities.iter().position(|x| x == entity)?;
        Some(self.means[h][e])
    }
}

impl fmt::Display for HourlyProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows: Vec<(String, &[f64])> = self
            .hours
            .iter()
            .map(|h| format!("{h:02}"))
            .zip(self.means.iter().map(Vec::as_slice))
            .collect();
        let title = format!("Hourly mean {}", self.variable);
        write_table(f, &title, "hour", &self.entities, &rows, 1)
    }
}
