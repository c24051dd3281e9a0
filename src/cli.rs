use std::env;
use std::path::PathBuf;

/// Command-line overrides. `None`/`false` leaves the config file (or the
/// reference default) in effect.
#[derive(Debug, Default)]
pub struct CliOptions {
    pub config: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    pub out_dir: Option<PathBuf>,
    pub dt_seconds: Option<f64>,
    pub bin_width_w: Option<f64>,
    pub no_charts: bool,
    pub json: bool,
    pub tui: bool,
}

pub fn parse_args() -> Result<CliOptions, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_args_from(args)
}

pub fn parse_args_from(args: Vec<String>) -> Result<CliOptions, String> {
    if args.len() == 1 && (args[0] == "--help" || args[0] == "-h") {
        print_usage();
        std::process::exit(0);
    }
    parse_options(&args)
}

fn parse_options(args: &[String]) -> Result<CliOptions, String> {
    let mut i = 0usize;
    let mut opts = CliOptions::default();

    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --config (expected a TOML file path)")?;
                if opts.config.replace(PathBuf::from(path)).is_some() {
                    return Err("--config provided more than once".to_string());
                }
            }
            "--data-dir" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --data-dir (expected a directory)")?;
                if opts.data_dir.replace(PathBuf::from(path)).is_some() {
                    return Err("--data-dir provided more than once".to_string());
                }
            }
            "--out-dir" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --out-dir (expected a directory)")?;
                if opts.out_dir.replace(PathBuf::from(path)).is_some() {
                    return Err("--out-dir provided more than once".to_string());
                }
            }
            "--dt" => {
                i += 1;
                let dt = parse_positive(args.next_or_err(i, "missing value for --dt (expected seconds)")?, "--dt")?;
                if opts.dt_seconds.replace(dt).is_some() {
                    return Err("--dt provided more than once".to_string());
                }
            }
            "--bin-width" => {
                i += 1;
                let width = parse_positive(
                    args.next_or_err(i, "missing value for --bin-width (expected watts)")?,
                    "--bin-width",
                )?;
                if opts.bin_width_w.replace(width).is_some() {
                    return Err("--bin-width provided more than once".to_string());
                }
            }
            "--no-charts" => opts.no_charts = true,
            "--json" => opts.json = true,
            "--tui" => {
                if cfg!(feature = "tui") {
                    opts.tui = true;
                } else {
                    return Err("--tui requires building with `--features tui`".to_string());
                }
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    if opts.json && opts.tui {
        return Err(
            "arguments `--json` and `--tui` are mutually exclusive; choose one output".to_string(),
        );
    }

    Ok(opts)
}

fn parse_positive(raw: &str, flag: &str) -> Result<f64, String> {
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
        _ => Err(format!("{flag} value \"{raw}\" is not a positive number")),
    }
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String> {
        self.get(index)
            .map(String::as_str)
            .ok_or_else(|| err.to_string())
    }
}

pub fn print_usage() {
    eprintln!("household-panel: descriptive analysis of household power logs");
    eprintln!();
    eprintln!("Usage: household-panel [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <path>       Load settings from a TOML file");
    eprintln!("  --data-dir <path>     Directory with one log file per household (default: raw_data)");
    eprintln!("  --out-dir <path>      Chart output directory (default: charts)");
    eprintln!("  --dt <seconds>        Sampling interval for energy integration (default: 120)");
    eprintln!("  --bin-width <watts>   Load-duration bin width (default: 200)");
    eprintln!("  --no-charts           Skip SVG chart rendering");
    eprintln!("  --json                Print the report as JSON");
    eprintln!("  --tui                 Browse the report in the terminal (feature `tui`)");
    eprintln!("  --help                Show this help message");
    eprintln!();
    eprintln!("Log verbosity follows RUST_LOG (default: household_panel=info).");
}
