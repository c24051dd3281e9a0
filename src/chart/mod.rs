//! SVG charts of an analysis run, one file per output.

mod bar;
mod line;

use std::error::Error;
use std::fs;
use std::path::PathBuf;

use plotters::chart::SeriesLabelPosition;
use tracing::info;

use crate::config::ChartConfig;
use crate::error::ChartError;
use crate::pipeline::AnalysisReport;

use bar::BarChart;
use line::LineChart;

pub const POWER_FILE: &str = "power.svg";
pub const ENERGY_FILE: &str = "energy.svg";
pub const HOURLY_FILE: &str = "hourly_power.svg";
pub const LOAD_DURATION_FILE: &str = "load_duration.svg";

/// Renders the power and energy traces, the hourly profile and the
/// load-duration distribution into `config.out_dir`.
///
/// Returns the written paths in that order.
///
/// # Errors
///
/// [`ChartError::Io`] if the directory cannot be created,
/// [`ChartError::Draw`] if plotting fails.
pub fn render_all(report: &AnalysisReport, config: &ChartConfig) -> Result<Vec<PathBuf>, ChartError> {
    fs::create_dir_all(&config.out_dir).map_err(|source| ChartError::Io {
        dir: config.out_dir.clone(),
        source,
    })?;
    let size = (config.width, config.height);
    let mut written = Vec::with_capacity(4);

    for (file, variable, chart) in [
        (
            POWER_FILE,
            &report.power_variable,
            LineChart {
                caption: "Instantaneous power",
                y_desc: "Power [W]",
                legend: SeriesLabelPosition::UpperMiddle,
            },
        ),
        (
            ENERGY_FILE,
            &report.energy_variable,
            LineChart {
                caption: "Cumulative energy",
                y_desc: "Energy [kWh]",
                legend: SeriesLabelPosition::UpperLeft,
            },
        ),
    ] {
        let path = config.out_dir.join(file);
        let Some(view) = report.panel.variable(variable) else {
            return Err(ChartError::Empty { path });
        };
        if view.time_index().is_empty() {
            return Err(ChartError::Empty { path });
        }
        finish(line::draw(&path, size, &chart, view), path, &mut written)?;
    }

    let hourly = &report.hourly;
    let path = config.out_dir.join(HOURLY_FILE);
    if hourly.hours.is_empty() {
        return Err(ChartError::Empty { path });
    }
    let chart = BarChart {
        caption: "Average power per hour of day",
        x_desc: "Hour of day [hh]",
        y_desc: "Power [W]",
        legend: SeriesLabelPosition::UpperMiddle,
        x_range: (-0.5, 23.5),
        slots: hourly.hours.iter().map(|&h| (f64::from(h) - 0.4, 0.8)).collect(),
        entities: &hourly.entities,
        values: &hourly.means,
    };
    let hour_label = |x: &f64| format!("{:02}", x.round() as i64);
    finish(bar::draw(&path, size, &chart, &hour_label), path, &mut written)?;

    let ld = &report.load_duration;
    let path = config.out_dir.join(LOAD_DURATION_FILE);
    let edges = ld.bin_edges();
    let (Some(&lo), Some(&hi)) = (edges.first(), edges.last()) else {
        return Err(ChartError::Empty { path });
    };
    let chart = BarChart {
        caption: "Load duration",
        x_desc: "Power [W]",
        y_desc: "Percentage of time [%]",
        legend: SeriesLabelPosition::UpperRight,
        x_range: (lo, hi + ld.bin_width),
        slots: edges
            .iter()
            .map(|&e| (e + 0.05 * ld.bin_width, 0.9 * ld.bin_width))
            .collect(),
        entities: &ld.entities,
        values: &ld.percent,
    };
    let watt_label = |x: &f64| format!("{x:.0}");
    finish(bar::draw(&path, size, &chart, &watt_label), path, &mut written)?;

    Ok(written)
}

fn finish(
    result: Result<(), Box<dyn Error>>,
    path: PathBuf,
    written: &mut Vec<PathBuf>,
) -> Result<(), ChartError> {
    match result {
        Ok(()) => {
            info!(path = %path.display(), "wrote chart");
            written.push(path);
            Ok(())
        }
        Err(e) => Err(ChartError::Draw {
            path,
            message: e.to_string(),
        }),
    }
}

/// `(lo, hi)` covering every finite value with 5% headroom on both sides.
///
/// Headroom scales with the data, so small kWh values keep their shape.
fn padded_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if !lo.is_finite() {
        return (0.0, 1.0);
    }
    let scale = (hi - lo).abs().max(hi.abs()).max(lo.abs());
    let pad = if scale > 0.0 { scale * 0.05 } else { 0.5 };
    (lo - pad, hi + pad)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_pads_both_sides() {
        let (lo, hi) = padded_range([0.0, 100.0].into_iter());
        assert_eq!((lo, hi), (-5.0, 105.0));
    }

    #[test]
    fn flat_series_still_has_height() {
        let (lo, hi) = padded_range([3.0, 3.0].into_iter());
        assert!(hi > lo);
    }

    #[test]
    fn small_values_keep_their_scale() {
        let (lo, hi) = padded_range([0.0, 0.004, 0.01].into_iter());
        assert!(lo < 0.0 && lo > -0.001, "{lo}");
        assert!(hi > 0.01 && hi < 0.011, "{hi}");
    }

    #[test]
    fn all_zero_falls_back_to_unit_pad() {
        assert_eq!(padded_range([0.0, 0.0].into_iter()), (-0.5, 0.5));
    }

    #[test]
    fn empty_range_defaults() {
        assert_eq!(padded_range(std::iter::empty()), (0.0, 1.0));
        assert_eq!(padded_range([f64::NAN].into_iter()), (0.0, 1.0));
    }
}
