//! Common UI components: header bar, status bar, and the help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::App;

/// Render the header bar with target, state, and the selected knobs.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let (state_text, state_style) = match app.last_online() {
        Some(true) => ("ONLINE", app.theme.status_style(Some(true))),
        Some(false) => ("OFFLINE", app.theme.status_style(Some(false))),
        None => ("WAITING", app.theme.status_style(None)),
    };

    let pause_style = if app.paused {
        Style::default().fg(app.theme.paused)
    } else {
        Style::default().fg(app.theme.online)
    };

    let line = Line::from(vec![
        Span::styled(" ● ", pause_style),
        Span::styled("UPWATCH ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::raw(app.address.clone()),
        Span::raw(" │ "),
        Span::styled(state_text, state_style),
        Span::raw(" │ cycle "),
        Span::styled(
            format!("{}s", app.settings.cycle.label()),
            Style::default().fg(app.theme.highlight),
        ),
        Span::raw(" │ window "),
        Span::styled(
            app.settings.window.label(),
            Style::default().fg(app.theme.highlight),
        ),
        if app.paused {
            Span::styled(" │ PAUSED", Style::default().fg(app.theme.paused))
        } else {
            Span::raw("")
        },
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Render the status bar at the bottom.
///
/// Shows temporary status messages when present, otherwise the stored
/// interval count and the key hints.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let status = format!(
        " {} intervals stored | Space:pause ←→:window +/-:cycle ?:help q:quit",
        app.interval_count()
    );
    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the chart.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        Line::from("  Space/p     Pause or resume probing"),
        Line::from("  ←/→ h/l     Narrow/widen history window"),
        Line::from("  +/-         Slower/faster probe cycle"),
        Line::from("  ?           Toggle this help"),
        Line::from("  q/Esc       Quit"),
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

    // Center the help overlay - responsive to terminal size
    let help_width = 44u16.min(area.width.saturating_sub(4));
    let help_height = 12u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    // Clear the area behind the help
    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
