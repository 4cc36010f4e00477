use std::time::Duration;

use pt_ratelimit::presets::riot;
use pt_ratelimit::presets::riot::Budget;

/// Calls held back from the short window per window (20/s paced as 19/s)
pub const SHORT_WINDOW_MARGIN: u32 = 1;

/// Calls held back from the long window per window (100/120s paced as 95/120s)
pub const LONG_WINDOW_MARGIN: u32 = 5;

/// Which budget the dispatch cadence is derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacingMode {
    /// Batch fits inside one long window; only the short window matters
    ShortWindow,
    /// Batch is larger than the long window; pace so it never blocks
    LongWindow,
}

/// Selected cadence for one batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub mode: PacingMode,
    pub interval: Duration,
}

impl Pacing {
    /// Time needed to dispatch `remaining` more requests at this cadence
    pub fn estimate(&self, remaining: usize) -> Duration {
        self.interval.saturating_mul(u32::try_from(remaining).unwrap_or(u32::MAX))
    }
}

/// Chooses between short- and long-window pacing by batch size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacingPolicy {
    short_interval: Duration,
    long_interval: Duration,
    long_window_ceiling: u32,
}

impl PacingPolicy {
    /// Derive intervals from the two budgets, each with its safety margin
    pub fn from_budgets(short: Budget, long: Budget) -> Self {
        Self {
            short_interval: Self::interval(short, SHORT_WINDOW_MARGIN),
            long_interval: Self::interval(long, LONG_WINDOW_MARGIN),
            long_window_ceiling: long.limit,
        }
    }

    /// Development key: 1/19 s or 120/95 s between dispatches, switching above 100 matches
    pub fn riot_development() -> Self {
        Self::from_budgets(riot::DEVELOPMENT_SHORT, riot::DEVELOPMENT_LONG)
    }

    fn interval(budget: Budget, margin: u32) -> Duration {
        budget.window / budget.limit.saturating_sub(margin).max(1)
    }

    /// Long-window pacing once the batch alone would exceed the long window's limit
    pub fn select(&self, match_count: usize) -> Pacing {
        self.select_within(match_count, self.long_window_ceiling)
    }

    /// Long-window pacing once the batch would not fit in `long_window_available`,
    /// the long-window uses still free when the batch starts
    ///
    /// Calls made before the batch (summoner lookup, id pages) share the long
    /// window with it, so short-window pacing is only safe while the whole
    /// batch fits in what they left over.
    pub fn select_within(&self, match_count: usize, long_window_available: u32) -> Pacing {
        if match_count > long_window_available.min(self.long_window_ceiling) as usize {
            Pacing { mode: PacingMode::LongWindow, interval: self.long_interval }
        } else {
            Pacing { mode: PacingMode::ShortWindow, interval: self.short_interval }
        }
    }
}

impl Default for PacingPolicy {
    fn default() -> Self {
        Self::riot_development()
    }
}
