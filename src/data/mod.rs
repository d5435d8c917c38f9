//! Data model for the uptime timeline.
//!
//! - [`interval`]: the interval store — append, merge, prune, windowed view
//! - [`window`]: user-selectable probe cadence and display lookback windows

pub mod interval;
pub mod window;

pub use interval::{Interval, IntervalStore, Sample, UnixMillis};
pub use window::{HistoryWindow, ProbeCycle};

use std::time::{SystemTime, UNIX_EPOCH};

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn now_millis() -> UnixMillis {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
