//! Durable storage for the interval sequence.
//!
//! One CBOR blob per monitored address, written atomically (tmp file +
//! rename) so a crash mid-write never clobbers the previous good state.
//! The blob is an explicit versioned record rather than an opaque native
//! serialization, so other tooling can read it and future builds can
//! migrate it.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use minicbor::{Decode, Encode};
use tracing::{error, info};

use crate::data::{Interval, IntervalStore};

/// Current state blob format version.
const STATE_VERSION: u16 = 1;

/// On-disk form of the interval sequence.
#[derive(Debug, Clone, PartialEq, Encode, Decode)]
struct StateFile {
    #[n(0)]
    version: u16,
    #[n(1)]
    intervals: Vec<Interval>,
}

/// Reads and writes the state blob for one monitored address.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    /// Create a store for `address`, keyed by its filesystem-safe form.
    pub fn new(data_dir: &Path, address: &str) -> Self {
        let path = data_dir.join(format!("{}.state", sanitize_key(address)));
        Self { path }
    }

    /// Path of the state blob.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist the full interval sequence.
    ///
    /// Errors are returned to the caller; the monitor loop logs and carries
    /// on, bounding data loss to one cycle.
    pub fn save(&self, intervals: &[Interval]) -> Result<()> {
        let state = StateFile { version: STATE_VERSION, intervals: intervals.to_vec() };
        let bytes = minicbor::to_vec(&state)
            .with_context(|| format!("encoding state for {}", self.path.display()))?;

        let tmp = self.path.with_extension("state.tmp");
        fs::write(&tmp, &bytes)
            .with_context(|| format!("writing {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("replacing {}", self.path.display()))?;
        Ok(())
    }

    /// Load the persisted sequence, or an empty store if there is none.
    ///
    /// A missing file is the normal first-run case. A corrupt or
    /// unrecognized blob is logged and treated as empty rather than
    /// propagated; the monitor must come up regardless.
    pub fn load(&self) -> IntervalStore {
        if !self.path.exists() {
            return IntervalStore::new();
        }
        match self.read_state() {
            Ok(intervals) => {
                info!(path = %self.path.display(), count = intervals.len(), "loaded state");
                IntervalStore::from_intervals(intervals)
            }
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "failed loading state, starting empty");
                IntervalStore::new()
            }
        }
    }

    fn read_state(&self) -> Result<Vec<Interval>> {
        let bytes = fs::read(&self.path)
            .with_context(|| format!("reading {}", self.path.display()))?;
        let state: StateFile =
            minicbor::decode(&bytes).with_context(|| format!("decoding {}", self.path.display()))?;
        if state.version != STATE_VERSION {
            bail!("unsupported state version {}", state.version);
        }
        Ok(state.intervals)
    }
}

/// Make an address usable as a file name (`8.8.8.8:53` → `8.8.8.8_53`).
pub fn sanitize_key(address: &str) -> String {
    address.replace([':', '/', '\\'], "_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn intervals() -> Vec<Interval> {
        vec![
            Interval { start: 1_000, end: 61_000, online: true },
            Interval { start: 120_000, end: 125_000, online: false },
        ]
    }

    #[test]
    fn save_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::new(dir.path(), "example.com:443");

        store.save(&intervals()).unwrap();
        let loaded = store.load();
        assert_eq!(loaded.intervals(), intervals().as_slice());
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::new(dir.path(), "example.com:443");
        assert!(store.load().is_empty());
    }

    #[test]
    fn corrupt_blob_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::new(dir.path(), "example.com:443");
        fs::write(store.path(), b"not cbor at all").unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn unknown_version_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::new(dir.path(), "example.com:443");
        let future = StateFile { version: 99, intervals: intervals() };
        fs::write(store.path(), minicbor::to_vec(&future).unwrap()).unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn save_replaces_previous_blob() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::new(dir.path(), "example.com:443");
        store.save(&intervals()).unwrap();
        let shorter = vec![Interval { start: 0, end: 5_000, online: true }];
        store.save(&shorter).unwrap();
        assert_eq!(store.load().intervals(), shorter.as_slice());
    }

    #[test]
    fn key_sanitization() {
        assert_eq!(sanitize_key("8.8.8.8:53"), "8.8.8.8_53");
        assert_eq!(sanitize_key("host/with:odd"), "host_with_odd");
    }
}
