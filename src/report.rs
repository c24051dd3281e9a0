//! Printed output of an analysis run: text tables or JSON.

use std::fmt;

use serde::Serialize;

use crate::aggregate::{DescriptiveStats, HourlyProfile, LoadDuration};
use crate::pipeline::AnalysisReport;

/// Serializable summary of an [`AnalysisReport`]; the panel itself is
/// reduced to its dimensions.
#[derive(Debug, Serialize)]
pub struct ReportSummary<'a> {
    pub entities: &'a [String],
    pub variables: Vec<&'a str>,
    pub timestamps: usize,
    pub first_timestamp: Option<String>,
    pub last_timestamp: Option<String>,
    pub dt_seconds: f64,
    pub stats: &'a DescriptiveStats,
    pub energy_kwh: Vec<EnergyTotal<'a>>,
    pub hourly: &'a HourlyProfile,
    pub load_duration: &'a LoadDuration,
}

#[derive(Debug, Serialize)]
pub struct EnergyTotal<'a> {
    pub entity: &'a str,
    pub kwh: f64,
}

impl<'a> ReportSummary<'a> {
    pub fn from_report(report: &'a AnalysisReport) -> Self {
        let index = report.panel.time_index();
        Self {
            entities: report.panel.entities(),
            variables: report.panel.variables(),
            timestamps: index.len(),
            first_timestamp: index.first().map(ToString::to_string),
            last_timestamp: index.last().map(ToString::to_string),
            dt_seconds: report.dt_seconds,
            stats: &report.stats,
            energy_kwh: report
                .energy_totals
                .iter()
                .map(|(entity, kwh)| EnergyTotal { entity, kwh: *kwh })
                .collect(),
            hourly: &report.hourly,
            load_duration: &report.load_duration,
        }
    }
}

/// Pretty-printed JSON of the report summary.
///
/// # Errors
///
/// Propagates `serde_json` failures.
pub fn to_json(report: &AnalysisReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&ReportSummary::from_report(report))
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let index = self.panel.time_index();
        writeln!(f, "=== Household Power Panel ===")?;
        writeln!(f, "Households:        {}", self.panel.entities().join(", "))?;
        writeln!(f, "Variables:         {}", self.panel.variables().join(", "))?;
        match (index.first(), index.last()) {
            (Some(first), Some(last)) => writeln!(
                f,
                "Time range:        {first} .. {last} ({} samples)",
                index.len()
            )?,
            _ => writeln!(f, "Time range:        empty")?,
        }
        writeln!(f, "Integration step:  {} s", self.dt_seconds)?;
        writeln!(f)?;

        write!(f, "{}", self.stats)?;
        writeln!(f)?;

        writeln!(f, "Total {} [kWh]", self.energy_variable)?;
        let width = self
            .energy_totals
            .iter()
            .map(|(e, _)| e.len())
            .max()
            .unwrap_or(0);
        for (entity, kwh) in &self.energy_totals {
            writeln!(f, "  {entity:<width$}  {kwh:>10.3}")?;
        }
        writeln!(f)?;

        write!(f, "{}", self.hourly)?;
        writeln!(f)?;
        write!(f, "{}", self.load_duration)
    }
}
