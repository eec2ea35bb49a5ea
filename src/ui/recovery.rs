//! Recovery view: severity tier, progress, ETA, and intervention sliders.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::duration::format_hours_minutes;

const SLIDER_WIDTH: usize = 20;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    if !app.recovery.visible {
        render_idle(frame, app, area);
        return;
    }

    let chunks = Layout::vertical([
        Constraint::Length(4), // severity + timing
        Constraint::Length(3), // progress gauge
        Constraint::Min(8),    // intervention sliders
    ])
    .split(area);

    render_summary(frame, app, chunks[0]);
    render_progress(frame, app, chunks[1]);
    render_interventions(frame, app, chunks[2]);
}

fn render_idle(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Recovery ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "  No active recovery simulation",
            Style::default().add_modifier(Modifier::DIM),
        )),
        Line::from(""),
        Line::from("  Press s to start one (severity 0.7)"),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_summary(frame: &mut Frame, app: &App, area: Rect) {
    let view = &app.recovery;

    let eta = match view.remaining {
        Some(remaining) => format!("~{} remaining", format_hours_minutes(remaining)),
        // Undefined until progress moves off 0%
        None => "estimating...".to_string(),
    };

    let lines = vec![
        Line::from(vec![
            Span::raw(" Severity: "),
            Span::styled(
                format!("{} ({:.2})", view.tier.label(), view.severity),
                app.theme.tier_style(view.tier),
            ),
        ]),
        Line::from(vec![
            Span::raw(" Elapsed: "),
            Span::styled(
                format_hours_minutes(view.elapsed),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("   "),
            Span::styled(eta, Style::default().add_modifier(Modifier::DIM)),
        ]),
    ];

    let block = Block::default()
        .title(" Recovery Simulation ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_progress(frame: &mut Frame, app: &App, area: Rect) {
    let percent = app.recovery.progress_percent.min(100) as u16;

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .gauge_style(Style::default().fg(app.theme.healthy))
        .percent(percent)
        .label(format!("{}%", percent));

    frame.render_widget(gauge, area);
}

fn render_interventions(frame: &mut Frame, app: &App, area: Rect) {
    let names = app.intervention_names();
    let selected_name = app.selected_intervention_name();

    let mut lines = Vec::new();
    for (i, name) in names.iter().enumerate() {
        let is_selected = i == app.selected_intervention;

        // The preview overlays the committed/server level for the selected
        // slider only.
        let level = match (&app.preview_level, is_selected) {
            (Some(preview), true) => *preview,
            _ => app.displayed_level(name),
        };

        let filled = (level * SLIDER_WIDTH as f64).round() as usize;
        let bar = format!(
            "[{}{}]",
            "█".repeat(filled.min(SLIDER_WIDTH)),
            "░".repeat(SLIDER_WIDTH.saturating_sub(filled))
        );

        let marker = if is_selected { ">" } else { " " };
        let pending = if is_selected && app.preview_level.is_some() {
            " (preview - Enter to apply)"
        } else {
            ""
        };

        let style = if is_selected {
            app.theme.selected
        } else {
            Style::default()
        };

        lines.push(Line::from(vec![
            Span::styled(format!(" {} {:<14}", marker, name), style),
            Span::styled(bar, Style::default().fg(app.theme.highlight)),
            Span::raw(format!(" {:>3.0}%", level * 100.0)),
            Span::styled(pending, Style::default().fg(app.theme.warning)),
        ]));
    }

    let block = Block::default()
        .title(format!(" Interventions ({}) ", names.len()))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
