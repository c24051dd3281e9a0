//! SVG rendering of a full analysis.

mod common;

use household_panel::chart::{self, ENERGY_FILE, HOURLY_FILE, LOAD_DURATION_FILE, POWER_FILE};
use household_panel::config::{AnalysisConfig, ChartConfig};
use household_panel::pipeline;

#[test]
fn writes_four_svg_files() {
    let data = common::two_households();
    let out = tempfile::TempDir::new().unwrap();

    let mut cfg = AnalysisConfig::reference();
    cfg.input.data_dir = data.path().to_path_buf();
    let report = pipeline::run(&cfg).unwrap();

    let charts = ChartConfig {
        out_dir: out.path().join("charts"),
        width: 640,
        height: 360,
        ..ChartConfig::default()
    };
    let written = chart::render_all(&report, &charts).expect("charts should render");

    let names: Vec<String> = written
        .iter()
        .filter_map(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, [POWER_FILE, ENERGY_FILE, HOURLY_FILE, LOAD_DURATION_FILE]);

    for path in &written {
        let svg = std::fs::read_to_string(path).unwrap();
        assert!(svg.contains("<svg"), "{} is not an SVG", path.display());
        assert!(svg.contains("house1"), "{} has no legend entry", path.display());
    }
    let power = std::fs::read_to_string(&written[0]).unwrap();
    assert!(power.contains("Power [W]"));
    let ld = std::fs::read_to_string(&written[3]).unwrap();
    assert!(ld.contains("Percentage of time [%]"));
}

#[test]
fn unwritable_out_dir_is_io_error() {
    let data = common::two_households();
    let mut cfg = AnalysisConfig::reference();
    cfg.input.data_dir = data.path().to_path_buf();
    let report = pipeline::run(&cfg).unwrap();

    // A regular file where the directory should go.
    let blocker = data.path().join("house1.csv");
    let charts = ChartConfig {
        out_dir: blocker.join("charts"),
        ..ChartConfig::default()
    };
    let err = chart::render_all(&report, &charts).unwrap_err();
    assert!(matches!(err, household_panel::ChartError::Io { .. }));
}
