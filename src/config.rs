//! TOML-based analysis configuration.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::io::{LoaderOptions, TimestampParser};

/// Top-level analysis configuration parsed from TOML.
///
/// Every section is optional and defaults to the reference run: CSV logs
/// under `raw_data/`, power in `Power`, two-minute sampling and 200 W
/// load-duration bins. Load from TOML with [`AnalysisConfig::from_toml_file`]
/// or use [`AnalysisConfig::reference`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Where the per-household logs live and how to read them.
    #[serde(default)]
    pub input: InputConfig,
    /// Variable names and numeric constants.
    #[serde(default)]
    pub analysis: AnalysisSection,
    /// Chart output.
    #[serde(default)]
    pub charts: ChartConfig,
}

/// Input discovery and parsing parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputConfig {
    /// Directory holding one delimited file per household.
    pub data_dir: PathBuf,
    /// Field delimiter; must be a single ASCII character.
    pub delimiter: String,
    /// Only load files with this extension (case-insensitive, no dot).
    pub extension: Option<String>,
    /// chrono format string for the time column; auto-detected when unset.
    pub timestamp_format: Option<String>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("raw_data"),
            delimiter: ",".to_string(),
            extension: None,
            timestamp_format: None,
        }
    }
}

/// Variable names and derivation constants.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisSection {
    /// Instantaneous power variable (W).
    pub power_variable: String,
    /// Name given to the derived cumulative energy variable (kWh).
    pub energy_variable: String,
    /// Sampling interval used for energy integration (s, must be > 0).
    pub dt_seconds: f64,
    /// Load-duration bin width (W, must be > 0).
    pub bin_width_w: f64,
}

impl Default for AnalysisSection {
    fn default() -> Self {
        Self {
            power_variable: "Power".to_string(),
            energy_variable: "Energy".to_string(),
            dt_seconds: 120.0,
            bin_width_w: 200.0,
        }
    }
}

/// SVG chart output parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChartConfig {
    pub enabled: bool,
    pub out_dir: PathBuf,
    /// Pixel width of every chart.
    pub width: u32,
    /// Pixel height of every chart.
    pub height: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            out_dir: PathBuf::from("charts"),
            width: 1280,
            height: 720,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"analysis.dt_seconds"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl AnalysisConfig {
    /// Returns the reference configuration (the built-in defaults).
    pub fn reference() -> Self {
        Self::default()
    }

    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "config".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if single_byte(&self.input.delimiter).is_none() {
            errors.push(ConfigError {
                field: "input.delimiter".into(),
                message: format!(
                    "must be a single ASCII character, got \"{}\"",
                    self.input.delimiter
                ),
            });
        }
        if self.input.extension.as_deref().is_some_and(str::is_empty) {
            errors.push(ConfigError {
                field: "input.extension".into(),
                message: "must not be empty when set".into(),
            });
        }

        let a = &self.analysis;
        if a.power_variable.is_empty() {
            errors.push(ConfigError {
                field: "analysis.power_variable".into(),
                message: "must not be empty".into(),
            });
        }
        if a.energy_variable.is_empty() {
            errors.push(ConfigError {
                field: "analysis.energy_variable".into(),
                message: "must not be empty".into(),
            });
        }
        if !a.power_variable.is_empty() && a.power_variable == a.energy_variable {
            errors.push(ConfigError {
                field: "analysis.energy_variable".into(),
                message: "must differ from analysis.power_variable".into(),
            });
        }
        if !(a.dt_seconds.is_finite() && a.dt_seconds > 0.0) {
            errors.push(ConfigError {
                field: "analysis.dt_seconds".into(),
                message: "must be > 0".into(),
            });
        }
        if !(a.bin_width_w.is_finite() && a.bin_width_w > 0.0) {
            errors.push(ConfigError {
                field: "analysis.bin_width_w".into(),
                message: "must be > 0".into(),
            });
        }

        let c = &self.charts;
        if c.width == 0 {
            errors.push(ConfigError {
                field: "charts.width".into(),
                message: "must be > 0".into(),
            });
        }
        if c.height == 0 {
            errors.push(ConfigError {
                field: "charts.height".into(),
                message: "must be > 0".into(),
            });
        }

        errors
    }

    /// Loader settings for the `[input]` section.
    ///
    /// Falls back to `,` if the delimiter is invalid; call [`validate`]
    /// first to reject that.
    ///
    /// [`validate`]: AnalysisConfig::validate
    pub fn loader_options(&self) -> LoaderOptions {
        let timestamps = match &self.input.timestamp_format {
            Some(format) => TimestampParser::with_format(format),
            None => TimestampParser::auto(),
        };
        LoaderOptions {
            delimiter: single_byte(&self.input.delimiter).unwrap_or(b','),
            extension: self.input.extension.clone(),
            timestamps,
        }
    }
}

fn single_byte(s: &str) -> Option<u8> {
    match s.as_bytes() {
        [b] if b.is_ascii() => Some(*b),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_config_valid() {
        let cfg = AnalysisConfig::reference();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "reference should be valid: {errors:?}");
    }

    #[test]
    fn reference_constants() {
        let cfg = AnalysisConfig::reference();
        assert_eq!(cfg.input.data_dir, PathBuf::from("raw_data"));
        assert_eq!(cfg.analysis.power_variable, "Power");
        assert_eq!(cfg.analysis.energy_variable, "Energy");
        assert_eq!(cfg.analysis.dt_seconds, 120.0);
        assert_eq!(cfg.analysis.bin_width_w, 200.0);
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[input]
data_dir = "logs"
delimiter = ";"
extension = "csv"
timestamp_format = "%d/%m/%Y %H:%M"

[analysis]
power_variable = "P"
energy_variable = "E"
dt_seconds = 60
bin_width_w = 100.0

[charts]
enabled = false
out_dir = "out"
width = 800
height = 600
"#;
        let cfg = AnalysisConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.analysis.dt_seconds), Some(60.0));
        assert_eq!(cfg.as_ref().map(|c| &*c.analysis.power_variable), Some("P"));
        assert_eq!(cfg.as_ref().map(|c| c.charts.enabled), Some(false));
        let opts = cfg.as_ref().map(AnalysisConfig::loader_options);
        assert_eq!(opts.as_ref().map(|o| o.delimiter), Some(b';'));
        assert_eq!(
            opts.as_ref().and_then(|o| o.extension.as_deref()),
            Some("csv")
        );
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[analysis]
dt_seconds = 120
bogus_field = true
"#;
        assert!(AnalysisConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[analysis]
bin_width_w = 50
"#;
        let cfg = AnalysisConfig::from_toml_str(toml).ok();
        assert_eq!(cfg.as_ref().map(|c| c.analysis.bin_width_w), Some(50.0));
        assert_eq!(cfg.as_ref().map(|c| c.analysis.dt_seconds), Some(120.0));
        assert_eq!(cfg.as_ref().map(|c| c.charts.width), Some(1280));
    }

    #[test]
    fn validation_catches_non_positive_dt() {
        let mut cfg = AnalysisConfig::reference();
        cfg.analysis.dt_seconds = 0.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "analysis.dt_seconds"));
    }

    #[test]
    fn validation_catches_bad_delimiter() {
        let mut cfg = AnalysisConfig::reference();
        cfg.input.delimiter = "::".to_string();
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "input.delimiter"));
    }

    #[test]
    fn validation_reports_every_problem() {
        let mut cfg = AnalysisConfig::reference();
        cfg.analysis.energy_variable = "Power".to_string();
        cfg.analysis.bin_width_w = -1.0;
        cfg.charts.height = 0;
        let fields: Vec<String> = cfg.validate().into_iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "analysis.energy_variable",
                "analysis.bin_width_w",
                "charts.height"
            ]
        );
    }

    #[test]
    fn missing_file_is_config_error() {
        let err = AnalysisConfig::from_toml_file(Path::new("/nonexistent/panel.toml"));
        assert!(err.is_err_and(|e| e.field == "config"));
    }
}
