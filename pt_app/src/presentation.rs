use std::time::Duration;

use pt_batch::Pacing;
use pt_batch::PacingMode;
use pt_batch::Progress;
use pt_batch::ProgressSink;
use tracing::info;

/// `1.8333` → `"1h 49m"`
///
/// Hours are rounded to two decimals first, then the fraction is converted to
/// whole minutes, truncating.
pub fn format_hours(hours: f64) -> String {
    let centi_hours = (hours * 100.0).round() as u64;
    let minutes = centi_hours % 100 * 60 / 100;
    format!("{}h {}m", centi_hours / 100, minutes)
}

/// `Duration` as `"{H}h {M}m {S}s"`, rounded to the nearest second
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs_f64().round() as u64;
    format!("{}h {}m {}s", secs / 3600, secs % 3600 / 60, secs % 60)
}

/// Renders batch progress as log lines
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn on_start(&self, total: usize, pacing: &Pacing) {
        if pacing.mode == PacingMode::LongWindow {
            info!("Due to rate limits, this will take {} to complete", format_duration(pacing.estimate(total)));
        }
    }

    fn on_progress(&self, progress: &Progress) {
        info!("Processed {}/{} matches. {} left", progress.processed, progress.total, format_duration(progress.remaining));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_hours() {
        assert_eq!(format_hours(6300.0 / 3600.0), "1h 45m");
        assert_eq!(format_hours(1.8333333), "1h 49m");
        assert_eq!(format_hours(0.0), "0h 0m");
        assert_eq!(format_hours(2.999), "3h 0m");
        assert_eq!(format_hours(1234.5), "1234h 30m");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(3723)), "1h 2m 3s");
        assert_eq!(format_duration(Duration::from_millis(59_600)), "0h 1m 0s");
        assert_eq!(format_duration(Duration::ZERO), "0h 0m 0s");
    }

    #[test]
    fn test_long_batch_eta() {
        let pacing = pt_batch::PacingPolicy::riot_development().select(950);

        // 950 × 120/95 s = 1200 s
        assert_eq!(format_duration(pacing.estimate(950)), "0h 20m 0s");
    }
}
