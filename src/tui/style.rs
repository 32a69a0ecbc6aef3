//! Color constants and auto-scaling helpers for the TUI.

use ratatui::style::Color;

/// Header bar foreground.
pub const HEADER_FG: Color = Color::White;
/// Header bar background.
pub const HEADER_BG: Color = Color::DarkGray;
/// Footer help text color.
pub const FOOTER_FG: Color = Color::DarkGray;
/// Highlight for the selected element.
pub const SELECTED: Color = Color::Yellow;
/// Transmission-line edge rows.
pub const LINE_FG: Color = Color::Blue;
/// Slider gauge fill.
pub const SLIDER_FG: Color = Color::Cyan;

/// Chart series palette, cycled when a bus has many attachments.
pub const SERIES_COLORS: [Color; 6] = [
    Color::Cyan,
    Color::Yellow,
    Color::Green,
    Color::Magenta,
    Color::Red,
    Color::Blue,
];

/// Color for the n-th chart series.
pub fn series_color(index: usize) -> Color {
    SERIES_COLORS[index % SERIES_COLORS.len()]
}

/// Computes Y-axis bounds across all chart series with 10% padding.
pub fn chart_bounds_y(series: &[Vec<(f64, f64)>]) -> [f64; 2] {
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
