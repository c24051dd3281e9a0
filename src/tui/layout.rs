//! TUI layout and widget rendering.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Axis, Bar, BarChart, BarGroup, Block, Borders, Cell, Chart, Dataset, GraphType, Paragraph,
    Row, Table, Tabs,
};

use super::runtime::{App, View};
use super::style;

/// Renders the full TUI frame.
pub fn render(frame: &mut Frame, app: &App<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Length(1), // tabs
            Constraint::Min(10),   // body
            Constraint::Length(1), // footer
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_tabs(frame, app, chunks[1]);
    match app.view {
        View::Summary => render_summary(frame, app, chunks[2]),
        View::Power => render_trace(frame, app, &app.report.power_variable, "W", chunks[2]),
        View::Energy => render_trace(frame, app, &app.report.energy_variable, "kWh", chunks[2]),
        View::Hourly => render_hourly(frame, app, chunks[2]),
        View::LoadDuration => render_load_duration(frame, app, chunks[2]),
    }
    render_footer(frame, chunks[3]);
}

/// Header bar: panel dimensions.
fn render_header(frame: &mut Frame, app: &App<'_>, area: Rect) {
    let panel = &app.report.panel;
    let header = Line::from(vec![
        Span::styled(
            " HOUSEHOLD PANEL ",
            Style::default()
                .fg(style::HEADER_FG)
                .bg(style::HEADER_BG)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            " {} households │ {} samples │ dt={} s ",
            panel.entities().len(),
            panel.time_index().len(),
            app.report.dt_seconds,
        )),
    ]);
    frame.render_widget(Paragraph::new(header), area);
}

fn render_tabs(frame: &mut Frame, app: &App<'_>, area: Rect) {
    let titles: Vec<String> = View::ALL
        .iter()
        .enumerate()
        .map(|(i, v)| format!("{}:{}", i + 1, v.title()))
        .collect();
    let tabs = Tabs::new(titles)
        .select(app.view.position())
        .highlight_style(
            Style::default()
                .fg(style::TAB_ACTIVE)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, area);
}

/// Per-household power statistics and energy totals.
fn render_summary(frame: &mut Frame, app: &App<'_>, area: Rect) {
    let report = app.report;
    let power = &report.power_variable;
    let rows: Vec<Row> = report
        .energy_totals
        .iter()
        .map(|(entity, kwh)| {
            let stat = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |x| format!("{x:.1}"));
            Row::new(vec![
                Cell::from(entity.clone()),
                Cell::from(stat(report.stats.mean_of(power, entity))),
                Cell::from(stat(report.stats.max_of(power, entity))),
                Cell::from(stat(report.stats.min_of(power, entity))),
                Cell::from(format!("{kwh:.3}")),
            ])
        })
        .collect();

    let header = Row::new(vec![
        "household".to_string(),
        format!("mean {power} [W]"),
        format!("max {power} [W]"),
        format!("min {power} [W]"),
        format!("{} [kWh]", report.energy_variable),
    ])
    .style(Style::default().add_modifier(Modifier::BOLD));

    let widths = [
        Constraint::Min(12),
        Constraint::Min(16),
        Constraint::Min(16),
        Constraint::Min(16),
        Constraint::Min(14),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().title(" Summary ").borders(Borders::ALL));
    frame.render_widget(table, area);
}

/// One line per household over hours since the first sample.
fn render_trace(frame: &mut Frame, app: &App<'_>, variable: &str, unit: &str, area: Rect) {
    let panel = &app.report.panel;
    let Some(view) = panel.variable(variable) else {
        frame.render_widget(Paragraph::new(format!("  no variable {variable}")), area);
        return;
    };
    let index = view.time_index();
    let Some(&start) = index.first() else {
        return;
    };

    let series: Vec<Vec<(f64, f64)>> = view
        .iter()
        .map(|(_, column)| {
            index
                .iter()
                .zip(column)
                .map(|(&ts, &v)| ((ts - start).num_seconds() as f64 / 3600.0, v))
                .collect()
        })
        .collect();

    let datasets: Vec<Dataset> = view
        .iter()
        .zip(&series)
        .enumerate()
        .map(|(i, ((entity, _), points))| {
            Dataset::default()
                .name(entity.to_string())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(style::series_color(i)))
                .data(points)
        })
        .collect();

    let y_bounds = style::auto_bounds_y(&series);
    let x_hi = series
        .first()
        .and_then(|s| s.last())
        .map_or(1.0, |p| p.0)
        .max(1.0 / 60.0);
    let end = index.last().copied().unwrap_or(start);

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .title(format!(" {variable} [{unit}] "))
                .borders(Borders::ALL),
        )
        .x_axis(
            Axis::default()
                .title("time")
                .bounds([0.0, x_hi])
                .labels(vec![
                    start.format("%m-%d %H:%M").to_string(),
                    end.format("%m-%d %H:%M").to_string(),
                ]),
        )
        .y_axis(
            Axis::default()
                .title(unit.to_string())
                .bounds(y_bounds)
                .labels(vec![
                    format!("{:.1}", y_bounds[0]),
                    format!("{:.1}", y_bounds[1]),
                ]),
        );
    frame.render_widget(chart, area);
}

/// Grouped bars; `values[group][entity]` rounded to whole units for height.
fn render_groups(
    frame: &mut Frame,
    title: String,
    labels: Vec<String>,
    values: &[Vec<f64>],
    area: Rect,
) {
    let mut chart = BarChart::default()
        .block(Block::default().title(title).borders(Borders::ALL))
        .bar_width(3)
        .bar_gap(0)
        .group_gap(2);
    for (label, row) in labels.into_iter().zip(values) {
        let bars: Vec<Bar> = row
            .iter()
            .enumerate()
            .map(|(e, &v)| {
                Bar::default()
                    .value(v.max(0.0).round() as u64)
                    .text_value(format!("{v:.0}"))
                    .style(Style::default().fg(style::series_color(e)))
            })
            .collect();
        chart = chart.data(BarGroup::default().label(Line::from(label)).bars(&bars));
    }
    frame.render_widget(chart, area);
}

fn render_hourly(frame: &mut Frame, app: &App<'_>, area: Rect) {
    let hourly = &app.report.hourly;
    let labels = hourly.hours.iter().map(|h| format!("{h:02}")).collect();
    let title = format!(
        " Mean {} per hour of day [W] ({}) ",
        hourly.variable,
        legend(&hourly.entities)
    );
    render_groups(frame, title, labels, &hourly.means, area);
}

fn render_load_duration(frame: &mut Frame, app: &App<'_>, area: Rect) {
    let ld = &app.report.load_duration;
    let labels = ld.bin_edges().iter().map(|e| format!("{e:.0}")).collect();
    let title = format!(
        " % of time per {} W bin ({}) ",
        ld.bin_width,
        legend(&ld.entities)
    );
    render_groups(frame, title, labels, &ld.percent, area);
}

/// Bar order, since ratatui bar charts have no legend.
fn legend(entities: &[String]) -> String {
    entities.join(" | ")
}

/// Footer with keybinding hints.
fn render_footer(frame: &mut Frame, area: Rect) {
    let footer = Paragraph::new(Line::from(Span::styled(
        " q:Quit  1-5:Tab  Tab/→:Next  Shift-Tab/←:Prev",
        Style::default().fg(style::FOOTER_FG),
    )));
    frame.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::runtime::tests::report;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn every_view_renders() {
        let report = report();
        let mut app = App::new(&report);
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        for position in 0..View::ALL.len() {
            app.select(position);
            terminal.draw(|frame| render(frame, &app)).unwrap();
        }
        let text: String = terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("HOUSEHOLD PANEL"));
    }

    #[test]
    fn summary_lists_households() {
        let report = report();
        let app = App::new(&report);
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| render(frame, &app)).unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("house1"));
        assert!(text.contains("house2"));
    }
}
