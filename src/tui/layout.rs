//! TUI layout and widget rendering.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Block, Borders, Chart, Clear, Dataset, Gauge, List, ListItem, Paragraph};

use super::runtime::App;
use super::style;

/// Renders the full TUI frame.
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Min(10),   // element panels
            Constraint::Length(3), // timestep slider
            Constraint::Length(1), // footer
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_elements(frame, app, chunks[1]);
    render_slider(frame, app, chunks[2]);
    render_footer(frame, app, chunks[3]);

    if let Some(popup) = &app.popup {
        render_popup(frame, popup, frame.area());
    }
}

/// Header bar: network name and slider position.
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let name = if app.snapshot.name.is_empty() {
        "unnamed network"
    } else {
        app.snapshot.name.as_str()
    };
    let header = Line::from(vec![
        Span::styled(
            " GRIDVIZ ",
            Style::default()
                .fg(style::HEADER_FG)
                .bg(style::HEADER_BG)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(name, Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!(
            " │ t={}/{} │ {} ",
            app.timestep,
            app.total_steps.saturating_sub(1),
            app.timestep_display(),
        )),
    ]);
    frame.render_widget(Paragraph::new(header), area);
}

/// Node and edge listings, side by side, with the selection highlighted.
fn render_elements(frame: &mut Frame, app: &App, area: Rect) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let view = app.view();
    let selected_id = app.elements.get(app.selected).map(|e| e.id.as_str());

    let nodes: Vec<ListItem> = view
        .nodes
        .values()
        .map(|n| {
            let label = n.label.replace('\n', " | ");
            let text = format!("[{}] {label}", n.shape.as_str());
            let item = ListItem::new(text);
            if Some(n.id.as_str()) == selected_id {
                item.style(Style::default().fg(style::SELECTED).add_modifier(Modifier::BOLD))
            } else {
                item
            }
        })
        .collect();
    frame.render_widget(
        List::new(nodes).block(Block::default().borders(Borders::ALL).title("nodes")),
        halves[0],
    );

    let edges: Vec<ListItem> = view
        .edges
        .values()
        .map(|e| {
            let text = format!("{} → {}  [{}]", e.from, e.to, e.label);
            let item = ListItem::new(text);
            if Some(e.id.as_str()) == selected_id {
                item.style(Style::default().fg(style::SELECTED).add_modifier(Modifier::BOLD))
            } else if e.color == crate::projection::LINE_COLOR {
                item.style(Style::default().fg(style::LINE_FG))
            } else {
                item
            }
        })
        .collect();
    frame.render_widget(
        List::new(edges).block(Block::default().borders(Borders::ALL).title("edges")),
        halves[1],
    );
}

/// Timestep slider rendered as a gauge over the shared time axis.
fn render_slider(frame: &mut Frame, app: &App, area: Rect) {
    let ratio = if app.total_steps <= 1 {
        0.0
    } else {
        app.timestep as f64 / (app.total_steps - 1) as f64
    };
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("timestep"))
        .gauge_style(Style::default().fg(style::SLIDER_FG))
        .ratio(ratio)
        .label(app.timestep_display().to_string());
    frame.render_widget(gauge, area);
}

/// Footer: status message if set, key help otherwise.
fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let text = app.status.as_deref().unwrap_or(
        " ←/→ timestep │ ↑/↓ select │ Enter chart │ Esc close/quit │ q quit",
    );
    frame.render_widget(
        Paragraph::new(Span::styled(text, Style::default().fg(style::FOOTER_FG))),
        area,
    );
}

/// Popup chart panel, centered over the frame.
fn render_popup(frame: &mut Frame, popup: &super::runtime::Popup, area: Rect) {
    let rect = centered_rect(80, 70, area);
    frame.render_widget(Clear, rect);

    // Gap-aware point sets: unknown samples are simply not plotted.
    let points: Vec<Vec<(f64, f64)>> = popup
        .chart
        .series
        .iter()
        .map(|s| {
            s.values
                .iter()
                .enumerate()
                .filter_map(|(t, v)| v.map(|v| (t as f64, v)))
                .collect()
        })
        .collect();

    let datasets: Vec<Dataset> = popup
        .chart
        .series
        .iter()
        .zip(&points)
        .enumerate()
        .map(|(i, (s, data))| {
            Dataset::default()
                .name(s.name.clone())
                .marker(symbols::Marker::Braille)
                .style(Style::default().fg(style::series_color(i)))
                .data(data)
        })
        .collect();

    let y_bounds = style::chart_bounds_y(&points);
    let x_hi = popup.chart.labels.len().saturating_sub(1).max(1) as f64;

    let x_label_lo = popup.chart.labels.first().cloned().unwrap_or_default();
    let x_label_hi = popup.chart.labels.last().cloned().unwrap_or_default();

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(popup.title.clone()),
        )
        .x_axis(
            Axis::default()
                .bounds([0.0, x_hi])
                .labels(vec![x_label_lo, x_label_hi]),
        )
        .y_axis(
            Axis::default()
                .bounds(y_bounds)
                .labels(vec![format!("{:.1}", y_bounds[0]), format!("{:.1}", y_bounds[1])]),
        );
    frame.render_widget(chart, rect);
}

/// A rect covering the given percentage of `area`, centered.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);
    horizontal[1]
}
