// Library crate: public API items may not be used by the binary
#![allow(unused)]

//! # upwatch
//!
//! A terminal connectivity monitor. upwatch probes a target `host:port` on
//! a timer, folds the stream of reachability samples into a compact
//! sequence of merged status intervals, persists that timeline across
//! restarts, and renders it as a color-coded strip chart.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │  probe task:  probe ──▶ monitor (append/merge/prune) ──▶ persist
//! │                              │
//! │  UI thread:   events ──▶ app ┴─▶ ui (strip chart) ──▶ Terminal
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`data`]**: the core — the interval store (append, merge within the
//!   gap tolerance, prune past the retention horizon, windowed views) and
//!   the probe-cycle/history-window enumerations
//! - **[`probe`]**: reachability checks (DNS + TCP connect, bounded timeouts)
//! - **[`monitor`]**: shared state and the background probe/settings loops
//! - **[`persist`]** / **[`settings`]**: versioned CBOR state blob and the
//!   JSON settings file, both keyed per monitored address
//! - **[`app`]** / **[`events`]** / **[`ui`]**: the ratatui front end
//!
//! ## Usage
//!
//! ```bash
//! # Monitor the default target (8.8.8.8:53)
//! upwatch
//!
//! # Monitor a specific host:port
//! upwatch example.com:443
//! ```

pub mod app;
pub mod data;
pub mod events;
pub mod monitor;
pub mod persist;
pub mod probe;
pub mod settings;
pub mod ui;

// Re-export main types for convenience
pub use app::App;
pub use data::{HistoryWindow, Interval, IntervalStore, ProbeCycle, Sample};
pub use monitor::{Control, Monitor};
pub use persist::StateStore;
pub use probe::{Probe, TcpProbe};
pub use settings::{Settings, SettingsStore};
