//! Descriptive analysis of per-household electrical power logs.
//!
//! One delimited file per household is loaded into an aligned
//! entity × time × variable [`panel::Panel`], reduced to descriptive
//! statistics, extended with cumulative energy, and aggregated into an
//! hour-of-day profile and a load-duration distribution.

pub mod aggregate;
pub mod chart;
pub mod cli;
pub mod config;
pub mod error;
pub mod io;
pub mod metrics;
pub mod observability;
/// Panel storage, alignment and views.
pub mod panel;
pub mod pipeline;
pub mod report;
#[cfg(feature = "tui")]
pub mod tui;

pub use error::{AnalysisError, ChartError};
pub use pipeline::{AnalysisReport, run};
