//! Per-variable, per-entity descriptive statistics.

use std::fmt;

use serde::Serialize;

use crate::panel::Panel;

use super::write_table;

/// Mean, max, and min of every variable for every entity over the full
/// time range.
///
/// Tables are variable-major: `mean[v][e]` is the mean of `variables[v]`
/// for `entities[e]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DescriptiveStats {
    pub entities: Vec<String>,
    pub variables: Vec<String>,
    pub mean: Vec<Vec<f64>>,
    pub max: Vec<Vec<f64>>,
    pub min: Vec<Vec<f64>>,
}

impl DescriptiveStats {
    /// Reduces the panel. Pure: the panel is only read.
    pub fn from_panel(panel: &Panel) -> Self {
        let variables: Vec<String> = panel.variables().into_iter().map(String::from).collect();
        let mut mean = Vec::with_capacity(variables.len());
        let mut max = Vec::with_capacity(variables.len());
        let mut min = Vec::with_capacity(variables.len());

        for name in &variables {
            let Some(view) = panel.variable(name) else {
                continue;
            };
            let (mut means, mut maxs, mut mins) = (Vec::new(), Vec::new(), Vec::new());
            for (_, column) in view.iter() {
                let n = column.len().max(1) as f64;
                means.push(column.iter().sum::<f64>() / n);
                maxs.push(column.iter().copied().fold(f64::NEG_INFINITY, f64::max));
                mins.push(column.iter().copied().fold(f64::INFINITY, f64::min));
            }
            mean.push(means);
            max.push(maxs);
            min.push(mins);
        }

        Self {
            entities: panel.entities().to_vec(),
            variables,
            mean,
            max,
            min,
        }
    }

    fn lookup(&self, table: &[Vec<f64>], variable: &str, entity: &str) -> Option<f64> {
        let v = self.variables.iter().position(|x| x == variable)?;
        let e = self.entities.iter().position(|x| x == entity)?;
        Some(table[v][e])
    }

    pub fn mean_of(&self, variable: &str, entity: &str) -> Option<f64> {
        self.lookup(&self.mean, variable, entity)
    }

    pub fn max_of(&self, variable: &str, entity: &str) -> Option<f64> {
        self.lookup(&self.max, variable, entity)
    }

    pub fn min_of(&self, variable: &str, entity: &str) -> Option<f64> {
        self.lookup(&self.min, variable, entity)
    }
}

impl fmt::Display for DescriptiveStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (title, table) in [("Mean", &self.mean), ("Max", &self.max), ("Min", &self.min)] {
            let rows: Vec<(String, &[f64])> = self
                .variables
                .iter()
                .cloned()
                .zip(table.iter().map(Vec::as_slice))
                .collect();
            write_table(f, title, "variable", &self.entities, &rows, 3)?;
        }
        Ok(())
    }
}
