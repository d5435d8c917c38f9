//! Persisted UI settings: probe cadence and display window.
//!
//! Stored as a small JSON file next to the state blob, keyed per address so
//! two monitors watching different targets never clobber each other. The
//! values are the label strings the UI shows, which keeps the file trivially
//! hand-editable. Missing or malformed files fall back to defaults; settings
//! are never a reason to fail startup.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::data::{HistoryWindow, ProbeCycle};
use crate::persist::sanitize_key;

/// In-memory settings, always valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Settings {
    pub cycle: ProbeCycle,
    pub window: HistoryWindow,
}

/// The JSON shape on disk: label strings, both optional.
#[derive(Debug, Serialize, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    cycle: Option<String>,
    #[serde(default)]
    history: Option<String>,
}

/// Reads and writes the settings file for one monitored address.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(data_dir: &Path, address: &str) -> Self {
        let path = data_dir.join(format!("{}.settings.json", sanitize_key(address)));
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings, falling back field-by-field to defaults.
    pub fn load(&self) -> Settings {
        let mut settings = Settings::default();
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(_) => return settings, // first run
        };
        let file: SettingsFile = match serde_json::from_str(&content) {
            Ok(file) => file,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "malformed settings, using defaults");
                return settings;
            }
        };
        if let Some(cycle) = file.cycle.as_deref() {
            match ProbeCycle::parse(cycle) {
                Ok(cycle) => settings.cycle = cycle,
                Err(e) => warn!(error = %e, "ignoring saved cycle"),
            }
        }
        if let Some(history) = file.history.as_deref() {
            match HistoryWindow::parse(history) {
                Ok(window) => settings.window = window,
                Err(e) => warn!(error = %e, "ignoring saved history window"),
            }
        }
        info!(path = %self.path.display(), ?settings, "loaded settings");
        settings
    }

    /// Write settings out; errors propagate for the caller to log.
    pub fn save(&self, settings: Settings) -> Result<()> {
        let file = SettingsFile {
            cycle: Some(settings.cycle.label().to_string()),
            history: Some(settings.window.label().to_string()),
        };
        let json = serde_json::to_string_pretty(&file)?;
        fs::write(&self.path, json)
            .with_context(|| format!("writing {}", self.path.display()))?;
        Ok(())
    }
}
