//! End-to-end analysis: load, align, reduce, derive, aggregate.

use chrono::TimeDelta;
use tracing::{info, warn};

use crate::aggregate::{DescriptiveStats, HourlyProfile, LoadDuration};
use crate::config::{AnalysisConfig, AnalysisSection};
use crate::error::AnalysisError;
use crate::io::load_entities;
use crate::metrics::{derive_energy, total_energy_kwh};
use crate::panel::{Panel, build_panel};

/// Everything one analysis run produces.
///
/// `panel` carries the derived energy variable; `stats` were taken before
/// the derivation and therefore cover the source variables only.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub panel: Panel,
    pub power_variable: String,
    pub energy_variable: String,
    pub dt_seconds: f64,
    pub stats: DescriptiveStats,
    /// `(entity, kWh)` at the end of the log.
    pub energy_totals: Vec<(String, f64)>,
    pub hourly: HourlyProfile,
    pub load_duration: LoadDuration,
}

/// Loads every file in `config.input.data_dir` and analyzes the panel.
///
/// # Errors
///
/// Any input, alignment or analysis failure aborts the run; nothing is
/// partially produced.
pub fn run(config: &AnalysisConfig) -> Result<AnalysisReport, AnalysisError> {
    let entities = load_entities(&config.input.data_dir, &config.loader_options())?;
    let panel = build_panel(entities)?;
    analyze(panel, &config.analysis)
}

/// Runs the reductions and the energy derivation on an aligned panel.
///
/// # Errors
///
/// Returns [`AnalysisError::UnknownVariable`] if the power variable is
/// missing and [`AnalysisError::DuplicateVariable`] if the panel already
/// holds the energy variable.
pub fn analyze(mut panel: Panel, params: &AnalysisSection) -> Result<AnalysisReport, AnalysisError> {
    check_sampling_interval(&panel, params.dt_seconds);

    let stats = DescriptiveStats::from_panel(&panel);
    derive_energy(
        &mut panel,
        &params.power_variable,
        &params.energy_variable,
        params.dt_seconds,
    )?;
    let energy_totals = total_energy_kwh(&panel, &params.energy_variable)?;
    let hourly = HourlyProfile::from_panel(&panel, &params.power_variable)?;
    let load_duration =
        LoadDuration::from_panel(&panel, &params.power_variable, params.bin_width_w)?;

    info!(
        entities = panel.entities().len(),
        timestamps = panel.time_index().len(),
        hours = hourly.hours.len(),
        bins = load_duration.bins.len(),
        "analysis complete"
    );

    Ok(AnalysisReport {
        panel,
        power_variable: params.power_variable.clone(),
        energy_variable: params.energy_variable.clone(),
        dt_seconds: params.dt_seconds,
        stats,
        energy_totals,
        hourly,
        load_duration,
    })
}

/// Warns when the observed spacing of the time index disagrees with `dt`.
/// The configured value is still used.
fn check_sampling_interval(panel: &Panel, dt_seconds: f64) {
    if panel.time_index().len() < 2 {
        return;
    }
    match panel.sampling_interval() {
        Some(step) if seconds(step) == dt_seconds => {}
        Some(step) => warn!(
            observed_seconds = seconds(step),
            dt_seconds, "sampling interval differs from configured dt"
        ),
        None => warn!(dt_seconds, "time index is not uniformly spaced"),
    }
}

fn seconds(step: TimeDelta) -> f64 {
    step.num_milliseconds() as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::{Entity, SourceTable};
    use chrono::NaiveDate;

    fn panel(variables: &[&str]) -> Panel {
        let start = NaiveDate::from_ymd_opt(2016, 2, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap();
        let index: Vec<_> = (0..3).map(|i| start + TimeDelta::minutes(2 * i)).collect();
        let make = |key: &str, base: f64| {
            Entity::new(
                key,
                SourceTable {
                    index: index.clone(),
                    variables: variables.iter().map(|v| v.to_string()).collect(),
                    columns: variables.iter().map(|_| vec![base, base, base]).collect(),
                },
            )
        };
        build_panel(vec![make("house1", 100.0), make("house2", 300.0)]).unwrap()
    }

    #[test]
    fn analyze_produces_every_output() {
        let report = analyze(panel(&["Power", "Vrms"]), &AnalysisSection::default()).unwrap();

        assert_eq!(report.stats.variables, vec!["Power", "Vrms"]);
        assert_eq!(report.panel.variables(), vec!["Power", "Vrms", "Energy"]);
        assert_eq!(report.energy_totals[0].0, "house1");
        assert!((report.energy_totals[0].1 - 0.01).abs() < 1e-12);
        assert_eq!(report.hourly.mean_at(0, "house2"), Some(300.0));
        assert_eq!(report.load_duration.bins, vec![0, 1]);
    }

    #[test]
    fn existing_energy_variable_aborts() {
        let err = analyze(panel(&["Power", "Energy"]), &AnalysisSection::default()).unwrap_err();
        assert!(matches!(err, AnalysisError::DuplicateVariable(_)));
    }

    #[test]
    fn missing_power_variable_aborts() {
        let err = analyze(panel(&["Vrms"]), &AnalysisSection::default()).unwrap_err();
        assert!(matches!(err, AnalysisError::UnknownVariable(v) if v == "Power"));
    }

    #[test]
    fn interval_mismatch_does_not_fail() {
        let params = AnalysisSection {
            dt_seconds: 60.0,
            ..AnalysisSection::default()
        };
        let report = analyze(panel(&["Power"]), &params).unwrap();
        assert!((report.energy_totals[1].1 - 3.0 * 300.0 * 60.0 / 3.6e6).abs() < 1e-12);
    }
}
