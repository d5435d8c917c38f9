//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Fill color for online spans in the chart.
    pub online: Color,
    /// Fill color for offline spans in the chart.
    pub offline: Color,
    /// Color for the paused indicator.
    pub paused: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Style for headings.
    pub header: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            online: Color::Green,
            offline: Color::Red,
            paused: Color::Yellow,
            border: Color::Gray,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            online: Color::Green,
            offline: Color::Red,
            paused: Color::Yellow,
            border: Color::DarkGray,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        // Use terminal-light crate to detect background luminance
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Style for a reachability state (`None` = no probe yet).
    pub fn status_style(&self, online: Option<bool>) -> Style {
        match online {
            Some(true) => Style::default().fg(self.online),
            Some(false) => Style::default().fg(self.offline).add_modifier(Modifier::BOLD),
            None => Style::default().add_modifier(Modifier::DIM),
        }
    }
}
