//! The monitoring engine: shared state and the background loops.
//!
//! Two tasks run on the tokio runtime next to the (blocking) TUI thread:
//! the probe loop (probe → append/merge/prune → persist) and a slow
//! settings-save loop. The UI talks to them through a `watch` channel of
//! [`Control`] values and reads chart data through [`Monitor`] snapshots.
//!
//! Every mutation of the interval sequence happens under one mutex hold, so
//! a reader can never observe a partially merged timeline. Sleeps are
//! cancellable: a control change or shutdown signal wakes them immediately,
//! which is what makes pause/resume and quit feel instant.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::data::{now_millis, Interval, IntervalStore, Sample, UnixMillis};
use crate::persist::StateStore;
use crate::probe::Probe;
use crate::settings::{Settings, SettingsStore};

/// How often the settings-save loop runs.
const SETTINGS_SAVE_CYCLE: Duration = Duration::from_secs(120);

/// User-adjustable knobs published from the UI thread to the loops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Control {
    pub paused: bool,
    pub settings: Settings,
}

/// Why a sleep ended.
enum Wake {
    Elapsed,
    ControlChanged,
    Shutdown,
}

/// Shared monitoring state: the interval sequence plus the last probe
/// outcome, behind one lock each.
#[derive(Debug)]
pub struct Monitor {
    store: Mutex<IntervalStore>,
    state: StateStore,
    last_online: Mutex<Option<bool>>,
}

impl Monitor {
    /// Load persisted state (or start empty) for the given address.
    pub fn new(state: StateStore) -> Arc<Self> {
        let store = state.load();
        Arc::new(Self { store: Mutex::new(store), state, last_online: Mutex::new(None) })
    }

    /// Fold one probe sample into the timeline.
    ///
    /// Append, merge and prune run under a single lock hold. An
    /// out-of-order timestamp is a polling-loop defect and propagates.
    pub fn record(&self, sample: Sample) -> Result<()> {
        {
            let mut store = self.store.lock();
            store.append_sample(sample)?;
            store.merge();
            store.prune(sample.at);
        }
        *self.last_online.lock() = Some(sample.online);
        Ok(())
    }

    /// Write the current sequence to disk. Failures are logged, not fatal:
    /// at worst one cycle of data is lost.
    pub fn persist(&self) {
        let snapshot = self.store.lock().intervals().to_vec();
        if let Err(e) = self.state.save(&snapshot) {
            error!(error = %e, "failed saving state");
        }
    }

    /// Copy of the intervals clipped to the display window.
    ///
    /// Takes the lock only long enough to build the Vec; rendering happens
    /// unlocked.
    pub fn window_snapshot(&self, now: UnixMillis, window_ms: i64) -> Vec<Interval> {
        self.store.lock().window_view(now, window_ms).collect()
    }

    /// Outcome of the most recent probe, if any ran yet.
    pub fn last_online(&self) -> Option<bool> {
        *self.last_online.lock()
    }

    /// Number of stored intervals (for the status bar).
    pub fn interval_count(&self) -> usize {
        self.store.lock().len()
    }
}

/// Sleep for `duration`, waking early on a control change or shutdown.
async fn interruptible_sleep(
    duration: Duration,
    ctrl: &mut watch::Receiver<Control>,
    shutdown: &mut watch::Receiver<bool>,
) -> Wake {
    tokio::select! {
        _ = sleep(duration) => Wake::Elapsed,
        res = shutdown.changed() => {
            if res.is_err() || *shutdown.borrow() {
                Wake::Shutdown
            } else {
                Wake::Elapsed
            }
        }
        res = ctrl.changed() => {
            if res.is_err() {
                Wake::Shutdown
            } else {
                Wake::ControlChanged
            }
        }
    }
}

/// The probe loop: one probe per cycle while running, nothing while paused.
///
/// A control change (pause toggle, cycle change) interrupts the sleep and
/// re-evaluates immediately; shutdown triggers a final flush.
pub async fn run_probe_loop<P: Probe>(
    monitor: Arc<Monitor>,
    probe: P,
    mut ctrl: watch::Receiver<Control>,
    mut shutdown: watch::Receiver<bool>,
) {
    info!("probe loop started");
    loop {
        if *shutdown.borrow() {
            break;
        }
        let control = *ctrl.borrow_and_update();
        if !control.paused {
            let online = probe.check().await;
            let sample = Sample { at: now_millis(), online };
            debug!(online, at = sample.at, "probe sample");
            match monitor.record(sample) {
                Ok(()) => monitor.persist(),
                // Out-of-order timestamps mean the clock jumped backwards
                // under us; skip the sample and keep the stored timeline.
                Err(e) => error!(error = %e, "dropping sample"),
            }
        }
        let cycle = Duration::from_secs(control.settings.cycle.secs());
        if let Wake::Shutdown = interruptible_sleep(cycle, &mut ctrl, &mut shutdown).await {
            break;
        }
    }
    monitor.persist();
    info!("probe loop stopped");
}

/// The settings-save loop: writes the current settings every two minutes
/// while running. Cheap enough that save-on-change is not worth the wiring.
pub async fn run_settings_loop(
    store: SettingsStore,
    mut ctrl: watch::Receiver<Control>,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        match interruptible_sleep(SETTINGS_SAVE_CYCLE, &mut ctrl, &mut shutdown).await {
            Wake::Shutdown => break,
            // A control change just restarts the wait; the periodic save
            // will pick the new values up.
            Wake::ControlChanged => continue,
            Wake::Elapsed => {}
        }
        let control = *ctrl.borrow_and_update();
        if !control.paused {
            if let Err(e) = store.save(control.settings) {
                error!(error = %e, "failed saving settings");
            }
        }
    }
}
