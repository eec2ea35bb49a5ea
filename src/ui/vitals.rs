//! Vitals view: metric list with current values plus a chart of the
//! selected metric's rolling window.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Cell, Chart, Dataset, GraphType, Paragraph, Row, Table},
    Frame,
};

use crate::app::App;
use crate::data::duration::format_clock;

/// Short display labels for the charted metrics.
fn metric_label(metric: &str) -> &'static str {
    match metric {
        "heart_rate" => "Heart Rate",
        "systolic_pressure" => "Systolic BP",
        "diastolic_pressure" => "Diastolic BP",
        "mean_pressure" => "Mean BP",
        "oxygen_saturation" => "SpO2",
        "respiratory_rate" => "Resp Rate",
        "cardiac_output" => "Cardiac Output",
        "recovery_progress" => "Recovery",
        _ => "Metric",
    }
}

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks =
        Layout::horizontal([Constraint::Length(34), Constraint::Min(40)]).split(area);

    render_metric_table(frame, app, chunks[0]);
    render_chart(frame, app, chunks[1]);
}

fn render_metric_table(frame: &mut Frame, app: &App, area: Rect) {
    let header = Row::new(vec![Cell::from("Metric"), Cell::from("Now"), Cell::from("Pts")])
        .height(1)
        .style(app.theme.header);

    let rows: Vec<Row> = app
        .metric_names()
        .iter()
        .enumerate()
        .map(|(i, metric)| {
            let current = app
                .current_value(metric)
                .map(|v| format!("{:.1}", v))
                .unwrap_or_else(|| "-".to_string());
            let count = app.store.series(metric).len();

            let row = Row::new(vec![
                Cell::from(metric_label(metric)),
                Cell::from(current),
                Cell::from(count.to_string()),
            ]);
            if i == app.selected_metric {
                row.style(app.theme.selected)
            } else {
                row
            }
        })
        .collect();

    let widths = [
        Constraint::Fill(2),
        Constraint::Length(8),
        Constraint::Length(4),
    ];

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .title(" Vitals ")
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(app.theme.border)),
    );

    frame.render_widget(table, area);
}

fn render_chart(frame: &mut Frame, app: &App, area: Rect) {
    let metric = app.selected_metric_name();
    let samples = app.store.series(metric);

    let block = Block::default()
        .title(format!(" {} ", metric_label(metric)))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    if samples.len() < 2 {
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "  Waiting for data...",
                Style::default().add_modifier(Modifier::DIM),
            )),
        ])
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    // Timestamps leave the stored model in seconds; milliseconds are the
    // display domain of the chart axis only.
    let points: Vec<(f64, f64)> =
        samples.iter().map(|s| (s.ts_secs * 1000.0, s.value)).collect();

    let x_min = points.first().map(|p| p.0).unwrap_or(0.0);
    let x_max = points.last().map(|p| p.0).unwrap_or(1.0);
    let y_min = points.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
    let y_max = points.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
    let y_pad = ((y_max - y_min) * 0.1).max(1.0);
    let (y_lo, y_hi) = (y_min - y_pad, y_max + y_pad);

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(app.theme.highlight))
        .data(&points);

    let x_axis = Axis::default()
        .bounds([x_min, x_max])
        .labels(vec![
            Line::from(format_clock(x_min / 1000.0)),
            Line::from(format_clock((x_min + x_max) / 2000.0)),
            Line::from(format_clock(x_max / 1000.0)),
        ])
        .style(Style::default().fg(app.theme.border));

    let y_axis = Axis::default()
        .bounds([y_lo, y_hi])
        .labels(vec![
            Line::from(format!("{:.0}", y_lo)),
            Line::from(format!("{:.0}", (y_lo + y_hi) / 2.0)),
            Line::from(format!("{:.0}", y_hi)),
        ])
        .style(Style::default().fg(app.theme.border));

    let chart = Chart::new(vec![dataset]).block(block).x_axis(x_axis).y_axis(y_axis);

    frame.render_widget(chart, area);
}
