use std::time::Duration;

use crate::pacing::Pacing;

/// Report progress every this many dispatched matches
pub const PROGRESS_INTERVAL: usize = 20;

/// Snapshot handed to the [`ProgressSink`] during a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub processed: usize,
    pub total: usize,
    /// Dispatch time still needed at the current cadence
    pub remaining: Duration,
}

impl Progress {
    pub fn estimate(processed: usize, total: usize, pacing: &Pacing) -> Self {
        Self { processed, total, remaining: pacing.estimate(total.saturating_sub(processed)) }
    }
}

/// Whether the match at `index` (zero based) triggers a progress report
#[inline]
pub fn should_report(index: usize) -> bool {
    index != 0 && index % PROGRESS_INTERVAL == 0
}

/// Receives batch progress; rendering is up to the implementor
pub trait ProgressSink: Send + Sync {
    /// Batch is about to dispatch `total` requests at `pacing`
    fn on_start(&self, total: usize, pacing: &Pacing);

    fn on_progress(&self, progress: &Progress);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pacing::PacingPolicy;

    #[test]
    fn test_should_report() {
        let reported: Vec<usize> = (0..65).filter(|i| should_report(*i)).collect();
        assert_eq!(reported, vec![20, 40, 60]);
    }

    #[test]
    fn test_estimate_uses_remaining_count() {
        let pacing = PacingPolicy::riot_development().select(150);
        let progress = Progress::estimate(20, 150, &pacing);

        assert_eq!(progress.remaining, pacing.interval * 130);
        assert_eq!(Progress::estimate(150, 150, &pacing).remaining, Duration::ZERO);
    }
}
