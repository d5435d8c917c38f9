//! User-selectable probe cadence and display lookback windows.

use anyhow::{bail, Result};

/// How far back the strip chart looks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryWindow {
    Minutes1,
    Minutes5,
    Minutes15,
    Minutes30,
    Hours1,
    Hours3,
    Hours6,
    Hours12,
    Days1,
    Days3,
    Days7,
}

impl Default for HistoryWindow {
    fn default() -> Self {
        HistoryWindow::Hours1
    }
}

impl HistoryWindow {
    /// All windows, shortest first (the order the UI cycles through).
    pub const ALL: [HistoryWindow; 11] = [
        HistoryWindow::Minutes1,
        HistoryWindow::Minutes5,
        HistoryWindow::Minutes15,
        HistoryWindow::Minutes30,
        HistoryWindow::Hours1,
        HistoryWindow::Hours3,
        HistoryWindow::Hours6,
        HistoryWindow::Hours12,
        HistoryWindow::Days1,
        HistoryWindow::Days3,
        HistoryWindow::Days7,
    ];

    /// Window length in seconds.
    pub fn secs(self) -> i64 {
        match self {
            HistoryWindow::Minutes1 => 60,
            HistoryWindow::Minutes5 => 5 * 60,
            HistoryWindow::Minutes15 => 15 * 60,
            HistoryWindow::Minutes30 => 30 * 60,
            HistoryWindow::Hours1 => 3_600,
            HistoryWindow::Hours3 => 3 * 3_600,
            HistoryWindow::Hours6 => 6 * 3_600,
            HistoryWindow::Hours12 => 12 * 3_600,
            HistoryWindow::Days1 => 86_400,
            HistoryWindow::Days3 => 3 * 86_400,
            HistoryWindow::Days7 => 7 * 86_400,
        }
    }

    /// Window length in milliseconds.
    pub fn millis(self) -> i64 {
        self.secs() * 1_000
    }

    /// Display label; also the form persisted in the settings file.
    pub fn label(self) -> &'static str {
        match self {
            HistoryWindow::Minutes1 => "1 m",
            HistoryWindow::Minutes5 => "5 m",
            HistoryWindow::Minutes15 => "15 m",
            HistoryWindow::Minutes30 => "30 m",
            HistoryWindow::Hours1 => "1 h",
            HistoryWindow::Hours3 => "3 h",
            HistoryWindow::Hours6 => "6 h",
            HistoryWindow::Hours12 => "12 h",
            HistoryWindow::Days1 => "1 d",
            HistoryWindow::Days3 => "3 d",
            HistoryWindow::Days7 => "7 d",
        }
    }

    /// Parse a settings-file label like "30 m", "1 h", "7 d".
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        for window in Self::ALL {
            if window.label() == s {
                return Ok(window);
            }
        }
        bail!("unknown history window: {:?}", s)
    }

    /// Next longer window, saturating at 7 days.
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|w| *w == self).unwrap_or(0);
        Self::ALL[(idx + 1).min(Self::ALL.len() - 1)]
    }

    /// Next shorter window, saturating at 1 minute.
    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|w| *w == self).unwrap_or(0);
        Self::ALL[idx.saturating_sub(1)]
    }
}

/// How often the probe runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeCycle {
    Secs1,
    Secs5,
    Secs10,
    Secs30,
}

impl Default for ProbeCycle {
    fn default() -> Self {
        ProbeCycle::Secs5
    }
}

impl ProbeCycle {
    pub const ALL: [ProbeCycle; 4] =
        [ProbeCycle::Secs1, ProbeCycle::Secs5, ProbeCycle::Secs10, ProbeCycle::Secs30];

    pub fn secs(self) -> u64 {
        match self {
            ProbeCycle::Secs1 => 1,
            ProbeCycle::Secs5 => 5,
            ProbeCycle::Secs10 => 10,
            ProbeCycle::Secs30 => 30,
        }
    }

    /// Display label; also the form persisted in the settings file.
    pub fn label(self) -> &'static str {
        match self {
            ProbeCycle::Secs1 => "1",
            ProbeCycle::Secs5 => "5",
            ProbeCycle::Secs10 => "10",
            ProbeCycle::Secs30 => "30",
        }
    }

    /// Parse a settings-file label like "5" or "30".
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        for cycle in Self::ALL {
            if cycle.label() == s {
                return Ok(cycle);
            }
        }
        bail!("unknown probe cycle: {:?}", s)
    }

    /// Next slower cadence, saturating at 30s.
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Self::ALL[(idx + 1).min(Self::ALL.len() - 1)]
    }

    /// Next faster cadence, saturating at 1s.
    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Self::ALL[idx.saturating_sub(1)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_seconds_match_labels() {
        assert_eq!(HistoryWindow::Minutes1.secs(), 60);
        assert_eq!(HistoryWindow::Hours3.secs(), 10_800);
        assert_eq!(HistoryWindow::Days7.secs(), 604_800);
    }

    #[test]
    fn window_labels_round_trip() {
        for window in HistoryWindow::ALL {
            assert_eq!(HistoryWindow::parse(window.label()).unwrap(), window);
        }
        assert!(HistoryWindow::parse("2 h").is_err());
    }

    #[test]
    fn window_cycling_saturates() {
        assert_eq!(HistoryWindow::Minutes1.prev(), HistoryWindow::Minutes1);
        assert_eq!(HistoryWindow::Days7.next(), HistoryWindow::Days7);
        assert_eq!(HistoryWindow::Hours1.next(), HistoryWindow::Hours3);
        assert_eq!(HistoryWindow::Hours1.prev(), HistoryWindow::Minutes30);
    }

    #[test]
    fn cycle_labels_round_trip() {
        for cycle in ProbeCycle::ALL {
            assert_eq!(ProbeCycle::parse(cycle.label()).unwrap(), cycle);
        }
        assert!(ProbeCycle::parse("2").is_err());
    }
}
