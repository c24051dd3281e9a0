//! household-panel entry point: CLI wiring and config-driven analysis.

use std::process;

use household_panel::chart;
use household_panel::cli::{self, CliOptions};
use household_panel::config::AnalysisConfig;
use household_panel::observability::init_tracing;
use household_panel::pipeline;
use household_panel::report;

/// Merges the TOML file (if any) with the command-line overrides.
fn resolve_config(cli: &CliOptions) -> Result<AnalysisConfig, String> {
    let mut config = match &cli.config {
        Some(path) => AnalysisConfig::from_toml_file(path).map_err(|e| e.to_string())?,
        None => AnalysisConfig::reference(),
    };

    if let Some(dir) = &cli.data_dir {
        config.input.data_dir = dir.clone();
    }
    if let Some(dir) = &cli.out_dir {
        config.charts.out_dir = dir.clone();
    }
    if let Some(dt) = cli.dt_seconds {
        config.analysis.dt_seconds = dt;
    }
    if let Some(width) = cli.bin_width_w {
        config.analysis.bin_width_w = width;
    }
    if cli.no_charts {
        config.charts.enabled = false;
    }

    Ok(config)
}

fn main() {
    let cli = match cli::parse_args() {
        Ok(opts) => opts,
        Err(e) => {
            eprintln!("error: {e}");
            cli::print_usage();
            process::exit(2);
        }
    };
    init_tracing();

    let config = match resolve_config(&cli) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let analysis = match pipeline::run(&config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };

    if config.charts.enabled {
        if let Err(e) = chart::render_all(&analysis, &config.charts) {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }

    #[cfg(feature = "tui")]
    if cli.tui {
        if let Err(e) = household_panel::tui::run(&analysis) {
            eprintln!("error: terminal viewer failed: {e}");
            process::exit(1);
        }
        return;
    }

    if cli.json {
        match report::to_json(&analysis) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("error: failed to serialize report: {e}");
                process::exit(1);
            }
        }
    } else {
        println!("{analysis}");
    }
}
