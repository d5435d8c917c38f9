//! The uptime strip chart.
//!
//! Maps the clipped interval sequence onto the chart width: each interval
//! becomes a run of colored columns (green online, red offline), gaps where
//! no sample exists stay unpainted. The mapping mirrors the windowed view's
//! guarantees, so columns never overlap and never extend past "now".

use chrono::{Local, TimeZone};
use ratatui::{
    layout::Rect,
    style::Style,
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::{Interval, UnixMillis};

/// Render the strip chart with its time-axis labels.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let (now, view) = app.chart_snapshot();
    let window_ms = app.settings.window.millis();
    let oldest = now - window_ms;

    let block = Block::default()
        .title(format!(" last {} ", app.settings.window.label()))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.width == 0 || inner.height < 2 {
        return;
    }

    // Bottom row is the axis; everything above is chart body.
    let body_height = inner.height - 1;
    let width = inner.width;

    let buf = frame.buffer_mut();
    for seg in &view {
        let Some((x0, x1)) = column_span(seg, oldest, window_ms, width) else {
            continue;
        };
        let style = if seg.online {
            Style::default().bg(app.theme.online)
        } else {
            Style::default().bg(app.theme.offline)
        };
        for x in x0..=x1 {
            for y in 0..body_height {
                buf[(inner.x + x, inner.y + y)].set_style(style);
            }
        }
    }

    // Time axis: window start on the left, "now" on the right.
    let axis_area = Rect::new(inner.x, inner.y + body_height, inner.width, 1);
    let left = format_time(oldest);
    let right = format_time(now);
    let pad = (axis_area.width as usize).saturating_sub(left.len() + right.len());
    let axis = Line::from(format!("{}{}{}", left, " ".repeat(pad), right));
    frame.render_widget(
        Paragraph::new(axis).style(Style::default().fg(app.theme.border)),
        axis_area,
    );
}

/// Map an interval to an inclusive column range, or `None` when it rounds
/// to nothing visible.
fn column_span(
    seg: &Interval,
    oldest: UnixMillis,
    window_ms: i64,
    width: u16,
) -> Option<(u16, u16)> {
    if window_ms <= 0 || width == 0 {
        return None;
    }
    let width = width as i64;
    let x0 = (seg.start - oldest) * width / window_ms;
    let x1 = (seg.end - oldest) * width / window_ms;
    // A zero-width sample still paints one column.
    let x0 = x0.clamp(0, width - 1) as u16;
    let x1 = x1.clamp(0, width - 1) as u16;
    Some((x0, x1))
}

fn format_time(at: UnixMillis) -> String {
    match Local.timestamp_millis_opt(at).single() {
        Some(t) => t.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => "-".to_string(),
    }
}
