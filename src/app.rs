//! Application state and user-interaction logic.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::watch;

use crate::data::{now_millis, Interval, UnixMillis};
use crate::monitor::{Control, Monitor};
use crate::settings::Settings;
use crate::ui::Theme;

/// Main application state for the TUI thread.
///
/// Owns the user-adjustable knobs and publishes them to the background
/// loops through the control channel whenever they change.
pub struct App {
    pub running: bool,
    pub paused: bool,
    pub show_help: bool,

    /// The monitored `host:port`, for display.
    pub address: String,
    pub settings: Settings,
    pub theme: Theme,

    monitor: Arc<Monitor>,
    ctrl: watch::Sender<Control>,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    pub fn new(
        address: String,
        monitor: Arc<Monitor>,
        ctrl: watch::Sender<Control>,
        settings: Settings,
    ) -> Self {
        Self {
            running: true,
            paused: false,
            show_help: false,
            address,
            settings,
            theme: Theme::auto_detect(),
            monitor,
            ctrl,
            status_message: None,
        }
    }

    /// Outcome of the most recent probe (`None` until the first completes).
    pub fn last_online(&self) -> Option<bool> {
        self.monitor.last_online()
    }

    /// Stored interval count, for the status bar.
    pub fn interval_count(&self) -> usize {
        self.monitor.interval_count()
    }

    /// Copy the currently visible timeline out of the store.
    ///
    /// Returns `(now, intervals)`; the lock is released before any
    /// rendering happens.
    pub fn chart_snapshot(&self) -> (UnixMillis, Vec<Interval>) {
        let now = now_millis();
        let view = self.monitor.window_snapshot(now, self.settings.window.millis());
        (now, view)
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < std::time::Duration::from_secs(3) {
                return Some(msg);
            }
        }
        None
    }

    /// Pause or resume probing.
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        self.publish_control();
        let state = if self.paused { "paused" } else { "resumed" };
        self.set_status_message(format!("Monitoring {}", state));
    }

    /// Widen the display window one step.
    pub fn widen_window(&mut self) {
        self.settings.window = self.settings.window.next();
        self.publish_control();
    }

    /// Narrow the display window one step.
    pub fn narrow_window(&mut self) {
        self.settings.window = self.settings.window.prev();
        self.publish_control();
    }

    /// Slow the probe cadence one step.
    pub fn slower_cycle(&mut self) {
        self.settings.cycle = self.settings.cycle.next();
        self.publish_control();
        self.set_status_message(format!("Probe cycle: {}s", self.settings.cycle.label()));
    }

    /// Speed the probe cadence one step.
    pub fn faster_cycle(&mut self) {
        self.settings.cycle = self.settings.cycle.prev();
        self.publish_control();
        self.set_status_message(format!("Probe cycle: {}s", self.settings.cycle.label()));
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    fn publish_control(&self) {
        // The receivers outlive the UI loop; a send failure means shutdown
        // is already underway, which is fine to ignore.
        let _ = self.ctrl.send(Control { paused: self.paused, settings: self.settings });
    }
}
