//! Viewer state: which output is on screen.

use crate::pipeline::AnalysisReport;

/// One tab per analysis output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Summary,
    Power,
    Energy,
    Hourly,
    LoadDuration,
}

impl View {
    /// Tab order.
    pub const ALL: [View; 5] = [
        View::Summary,
        View::Power,
        View::Energy,
        View::Hourly,
        View::LoadDuration,
    ];

    pub fn title(self) -> &'static str {
        match self {
            View::Summary => "Summary",
            View::Power => "Power",
            View::Energy => "Energy",
            View::Hourly => "Hourly",
            View::LoadDuration => "Load duration",
        }
    }

    pub fn position(self) -> usize {
        Self::ALL.iter().position(|&v| v == self).unwrap_or(0)
    }
}

/// TUI application state over a finished analysis.
pub struct App<'a> {
    pub report: &'a AnalysisReport,
    pub view: View,
    /// Whether the user has requested quit.
    pub quit: bool,
}

impl<'a> App<'a> {
    pub fn new(report: &'a AnalysisReport) -> Self {
        Self {
            report,
            view: View::Summary,
            quit: false,
        }
    }

    /// Selects the tab at `position` (0-based); out of range is ignored.
    pub fn select(&mut self, position: usize) {
        if let Some(&view) = View::ALL.get(position) {
            self.view = view;
        }
    }

    /// Next tab, wrapping around.
    pub fn next_view(&mut self) {
        self.select((self.view.position() + 1) % View::ALL.len());
    }

    /// Previous tab, wrapping around.
    pub fn prev_view(&mut self) {
        let n = View::ALL.len();
        self.select((self.view.position() + n - 1) % n);
    }
}
