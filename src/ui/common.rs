//! Common UI components shared across views.
//!
//! Header bar, tab bar, status bar, and the help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, View};

/// Render the header bar: state badge, description, and headline vitals.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(ref err) = app.load_error {
        // First-fetch placeholder: nothing has ever been displayed
        let line = Line::from(vec![
            Span::styled(" VITALWATCH ", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(
                format!("| {}", err),
                Style::default().fg(app.theme.warning),
            ),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    }

    let mut spans = vec![
        Span::styled(" VITALWATCH ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::styled(
            format!("● {} ", app.state.state.label()),
            app.theme.state_style(app.state.state),
        ),
        Span::styled(
            format!("- {} ", app.state.description),
            Style::default().add_modifier(Modifier::DIM),
        ),
    ];

    // Headline vitals from the latest instantaneous record
    for (metric, short) in [
        ("heart_rate", "HR"),
        ("oxygen_saturation", "SpO2"),
        ("hrv", "HRV"),
    ] {
        if let Some(value) = app.current_value(metric) {
            spans.push(Span::raw(format!("│ {} {:.0} ", short, value)));
        }
    }

    if app.recovery.visible {
        spans.push(Span::styled(
            format!(
                "│ Recovery {} {}% ",
                app.recovery.tier.label(),
                app.recovery.progress_percent
            ),
            app.theme.tier_style(app.recovery.tier),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the tab bar showing available views.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = vec![Line::from(" 1:Vitals "), Line::from(" 2:Recovery ")];

    let selected = match app.current_view {
        View::Vitals => 0,
        View::Recovery => 1,
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the status bar at the bottom.
///
/// Shows the data source, the last-check clock, context controls, and any
/// degraded-poll diagnostic.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let checked = match app.last_checked {
        Some(at) => format!("checked {:.1}s ago", at.elapsed().as_secs_f64()),
        None => "waiting for first poll".to_string(),
    };

    let controls = match app.current_view {
        View::Vitals => "↑↓:metric Tab:switch r:refresh ?:help q:quit",
        View::Recovery => "↑↓:select ←→:adjust Enter:commit s:start x:stop ?:help q:quit",
    };

    let mut status = format!(" {} | {} | {}", app.source_description(), checked, controls);
    if let Some(ref diag) = app.degraded {
        status.push_str(&format!(" | stale: {}", diag));
    }

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Navigation",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  Tab         Switch views"),
        Line::from("  1 / 2       Vitals / Recovery"),
        Line::from("  ↑/↓ j/k     Select metric or intervention"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Recovery",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  ←/→ h/l     Adjust slider (local preview)"),
        Line::from("  Enter       Commit the slider level"),
        Line::from("  Esc         Cancel the preview"),
        Line::from("  s           Start recovery simulation"),
        Line::from("  x           Stop recovery simulation"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " General",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  r           Refresh now"),
        Line::from("  q           Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    let help_width = 44u16.min(area.width.saturating_sub(4));
    let help_height = 22u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    frame.render_widget(ratatui::widgets::Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
