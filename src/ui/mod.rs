//! Terminal rendering.
//!
//! - [`chart`]: the color-coded uptime strip chart
//! - [`common`]: header bar, status bar, help overlay
//! - [`theme`]: light/dark styling with terminal detection

pub mod chart;
pub mod common;
pub mod theme;

pub use theme::Theme;
