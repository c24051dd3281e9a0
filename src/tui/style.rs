//! Color constants and auto-scaling helpers for the TUI.

use ratatui::style::Color;

/// Header bar foreground.
pub const HEADER_FG: Color = Color::White;
/// Header bar background.
pub const HEADER_BG: Color = Color::DarkGray;
/// Selected tab.
pub const TAB_ACTIVE: Color = Color::Yellow;
/// Footer help text color.
pub const FOOTER_FG: Color = Color::DarkGray;

const SERIES: [Color; 6] = [
    Color::Cyan,
    Color::Magenta,
    Color::Green,
    Color::Yellow,
    Color::Blue,
    Color::Red,
];

/// Color of the `i`-th entity, cycling after six.
pub fn series_color(i: usize) -> Color {
    SERIES[i % SERIES.len()]
}

/// Computes Y-axis bounds from chart data points with 10% padding.
pub fn auto_bounds_y(series: &[Vec<(f64, f64)>]) -> [f64; 2] {
    let all = series.iter().flatten().map(|&(_, y)| y);
    let min = all.clone().fold(f64::INFINITY, f64::min);
    let max = all.fold(f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() {
        return [-1.0, 1.0];
    }
    let range = (max - min).max(0.1);
    let pad = range * 0.1;
    [min - pad, max + pad]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_pad_the_data() {
        let [lo, hi] = auto_bounds_y(&[vec![(0.0, 0.0), (1.0, 10.0)], vec![(0.0, 5.0)]]);
        assert!((lo + 1.0).abs() < 1e-12);
        assert!((hi - 11.0).abs() < 1e-12);
    }

    #[test]
    fn empty_series_default_bounds() {
        assert_eq!(auto_bounds_y(&[]), [-1.0, 1.0]);
    }

    #[test]
    fn colors_cycle() {
        assert_eq!(series_color(0), series_color(6));
    }
}
