//! The interval store: merged uptime/downtime spans behind the strip chart.
//!
//! Probe results arrive as discrete point-in-time samples. Stored naively,
//! the timeline would grow by one entry per probe tick forever. The store
//! instead keeps a compact sequence of maximal contiguous intervals:
//! consecutive same-status samples within [`MERGE_GAP_MS`] collapse into a
//! single span, and spans that age out of the retention horizon are pruned
//! unless they are individually long enough to stay interesting.

use anyhow::{bail, Result};
use minicbor::{Decode, Encode};

/// Milliseconds since the Unix epoch.
pub type UnixMillis = i64;

/// Maximum gap between same-status samples that still counts as contiguous.
///
/// Chosen to exceed the longest probe cycle (30s) plus scheduling slack, so
/// a delayed tick never splits a healthy run in two.
pub const MERGE_GAP_MS: i64 = 35_000;

/// Base retention horizon: 7 days.
pub const MAX_HISTORY_MS: i64 = 7 * 86_400_000;

/// Grace period past the horizon before an interval is actually dropped,
/// so a span still being extended near the cutoff is never truncated.
pub const BUFFER_WINDOW_MS: i64 = 300_000;

/// Intervals at least this long survive pruning regardless of age.
pub const MIN_SIGNIFICANT_MS: i64 = 300_000;

/// A single timestamped reachability observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    pub at: UnixMillis,
    pub online: bool,
}

/// A maximal contiguous span of constant reachability status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode)]
pub struct Interval {
    #[n(0)]
    pub start: UnixMillis,
    #[n(1)]
    pub end: UnixMillis,
    #[n(2)]
    pub online: bool,
}

impl Interval {
    /// Length of the span in milliseconds (zero for a lone sample).
    pub fn duration_ms(&self) -> i64 {
        self.end - self.start
    }
}

/// Ordered, non-overlapping sequence of status intervals.
///
/// Invariants after every mutation:
/// - intervals are sorted by `start` and do not overlap;
/// - `start <= end` for each interval;
/// - no adjacent pair has equal status *and* a gap within [`MERGE_GAP_MS`]
///   (such pairs are already merged).
#[derive(Debug, Clone, Default)]
pub struct IntervalStore {
    intervals: Vec<Interval>,
}

impl IntervalStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from persisted intervals.
    ///
    /// Runs one merge pass so a blob written by an older build (or edited
    /// by hand) still satisfies the adjacency invariant.
    pub fn from_intervals(intervals: Vec<Interval>) -> Self {
        let mut store = Self { intervals };
        store.merge();
        store
    }

    /// The full stored sequence, oldest first.
    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Append a probe sample as a zero-width interval at the tail.
    ///
    /// Samples must arrive in non-decreasing time order; a timestamp before
    /// the stored tail indicates a defect in the polling loop and is
    /// rejected rather than silently reordered.
    pub fn append_sample(&mut self, sample: Sample) -> Result<()> {
        if let Some(last) = self.intervals.last() {
            if sample.at < last.end {
                bail!(
                    "out-of-order sample: {} is before stored tail {}",
                    sample.at,
                    last.end
                );
            }
        }
        self.intervals.push(Interval {
            start: sample.at,
            end: sample.at,
            online: sample.online,
        });
        Ok(())
    }

    /// Collapse adjacent same-status intervals whose gap is within
    /// [`MERGE_GAP_MS`].
    ///
    /// Single left-to-right pass; a status change always starts a new
    /// interval regardless of gap. Idempotent: re-running on an already
    /// merged sequence changes nothing.
    pub fn merge(&mut self) {
        if self.intervals.len() < 2 {
            return;
        }
        let mut merged: Vec<Interval> = Vec::with_capacity(self.intervals.len());
        let mut current = self.intervals[0];
        for seg in &self.intervals[1..] {
            let gap = seg.start - current.end;
            if seg.online == current.online && gap <= MERGE_GAP_MS {
                current.end = seg.end;
            } else {
                merged.push(current);
                current = *seg;
            }
        }
        merged.push(current);
        self.intervals = merged;
    }

    /// Drop intervals that are both past the retention horizon and too
    /// short to matter.
    ///
    /// An interval survives if it ends after `now - (MAX_HISTORY_MS +
    /// BUFFER_WINDOW_MS)` or lasted longer than [`MIN_SIGNIFICANT_MS`].
    /// Survivors keep their boundaries untouched.
    pub fn prune(&mut self, now: UnixMillis) {
        let cutoff = now - (MAX_HISTORY_MS + BUFFER_WINDOW_MS);
        self.intervals
            .retain(|seg| seg.end > cutoff || seg.duration_ms() > MIN_SIGNIFICANT_MS);
    }

    /// Intervals clipped to the display window `[now - window_ms, now]`.
    ///
    /// Intervals ending before the window are skipped; the first visible
    /// interval has its start clamped to the window edge and the last has
    /// its end clamped to `now`. Output stays ordered and non-overlapping.
    pub fn window_view(
        &self,
        now: UnixMillis,
        window_ms: i64,
    ) -> impl Iterator<Item = Interval> + '_ {
        let oldest = now - window_ms;
        self.intervals
            .iter()
            .filter(move |seg| seg.end >= oldest && seg.start <= now)
            .map(move |seg| Interval {
                start: seg.start.max(oldest),
                end: seg.end.min(now),
                online: seg.online,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(samples: &[(i64, bool)]) -> IntervalStore {
        let mut store = IntervalStore::new();
        for &(at, online) in samples {
            store.append_sample(Sample { at, online }).unwrap();
        }
        store.merge();
        store
    }

    #[test]
    fn samples_within_gap_merge_into_one() {
        let store = store_with(&[(1_000, true), (31_000, true)]);
        assert_eq!(
            store.intervals(),
            &[Interval { start: 1_000, end: 31_000, online: true }]
        );
    }

    #[test]
    fn samples_past_gap_stay_separate() {
        let store = store_with(&[(1_000, true), (41_000, true)]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.intervals()[0].end, 1_000);
        assert_eq!(store.intervals()[1].start, 41_000);
    }

    #[test]
    fn status_change_never_merges() {
        let store = store_with(&[(1_000, true), (2_000, false)]);
        assert_eq!(store.len(), 2);
        assert!(store.intervals()[0].online);
        assert!(!store.intervals()[1].online);
    }

    #[test]
    fn merge_is_idempotent() {
        let mut store = store_with(&[
            (0, true),
            (5_000, true),
            (10_000, false),
            (15_000, false),
            (60_000, false),
        ]);
        let once = store.intervals().to_vec();
        store.merge();
        assert_eq!(store.intervals(), once.as_slice());
    }

    #[test]
    fn out_of_order_sample_is_rejected() {
        let mut store = store_with(&[(10_000, true)]);
        let err = store.append_sample(Sample { at: 5_000, online: true });
        assert!(err.is_err());
        // Store unchanged after the rejection.
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn equal_timestamp_is_accepted() {
        let mut store = store_with(&[(10_000, true)]);
        store.append_sample(Sample { at: 10_000, online: true }).unwrap();
        store.merge();
        assert_eq!(
            store.intervals(),
            &[Interval { start: 10_000, end: 10_000, online: true }]
        );
    }

    #[test]
    fn prune_keeps_significant_old_outage() {
        let now = 20 * 86_400_000;
        let ten_days_ago = now - 10 * 86_400_000;
        let mut store = IntervalStore::from_intervals(vec![
            // 400s outage, far past the horizon: kept.
            Interval { start: ten_days_ago, end: ten_days_ago + 400_000, online: false },
            // 10s blip at the same age: dropped.
            Interval { start: ten_days_ago + 3_600_000, end: ten_days_ago + 3_610_000, online: true },
            // Recent interval: kept.
            Interval { start: now - 1_000, end: now, online: true },
        ]);
        store.prune(now);
        assert_eq!(store.len(), 2);
        assert_eq!(store.intervals()[0].start, ten_days_ago);
        assert_eq!(store.intervals()[1].end, now);
    }

    #[test]
    fn prune_respects_buffer_window() {
        let now = 20 * 86_400_000;
        // Ends just inside the horizon-plus-buffer: kept despite being short.
        let end = now - MAX_HISTORY_MS - BUFFER_WINDOW_MS + 1_000;
        let mut store =
            IntervalStore::from_intervals(vec![Interval { start: end - 5_000, end, online: true }]);
        store.prune(now);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn window_view_clips_to_bounds() {
        let store = store_with(&[(0, true), (30_000, true), (100_000, false)]);
        let now = 110_000;
        let view: Vec<Interval> = store.window_view(now, 100_000).collect();
        for seg in &view {
            assert!(seg.start >= now - 100_000);
            assert!(seg.end <= now);
        }
        // First interval's start is clamped to the window edge.
        assert_eq!(view[0].start, 10_000);
    }

    #[test]
    fn window_view_skips_intervals_before_window() {
        let store = store_with(&[(0, false), (500_000, true), (520_000, true)]);
        let view: Vec<Interval> = store.window_view(530_000, 60_000).collect();
        assert_eq!(view, vec![Interval { start: 500_000, end: 520_000, online: true }]);
    }

    #[test]
    fn window_view_covers_each_sampled_instant_once() {
        let store = store_with(&[(10_000, true), (20_000, true), (70_000, false)]);
        let now = 80_000;
        let view: Vec<Interval> = store.window_view(now, 80_000).collect();
        // Every sampled instant falls in exactly one view interval.
        for probe_at in [10_000, 15_000, 20_000, 70_000] {
            let covering: Vec<&Interval> =
                view.iter().filter(|s| s.start <= probe_at && probe_at <= s.end).collect();
            assert_eq!(covering.len(), 1, "instant {} not covered exactly once", probe_at);
        }
        // And the view stays ordered and non-overlapping.
        for pair in view.windows(2) {
            assert!(pair[0].end < pair[1].start);
        }
    }

    #[test]
    fn online_run_then_offline_point() {
        // Three online samples 5s apart, then one offline sample.
        let store =
            store_with(&[(0, true), (5_000, true), (10_000, true), (15_000, false)]);
        assert_eq!(
            store.intervals(),
            &[
                Interval { start: 0, end: 10_000, online: true },
                Interval { start: 15_000, end: 15_000, online: false },
            ]
        );
    }

    #[test]
    fn from_intervals_restores_merge_invariant() {
        // An unmerged blob (adjacent same-status within gap) gets repaired.
        let store = IntervalStore::from_intervals(vec![
            Interval { start: 0, end: 0, online: true },
            Interval { start: 5_000, end: 5_000, online: true },
        ]);
        assert_eq!(store.len(), 1);
        assert_eq!(store.intervals()[0].end, 5_000);
    }
}
