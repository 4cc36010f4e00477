use std::sync::Arc;

use pt_http::HttpError;
use pt_http::MatchDuration;
use pt_http::MatchId;
use pt_http::RiotClient;
use pt_ratelimit::Clock;
use pt_ratelimit::RateLimiter;
use tokio::task::JoinSet;
use tracing::debug;
use tracing::info;

use crate::errors::Result;
use crate::pacing::Pacing;
use crate::pacing::PacingPolicy;
use crate::progress;
use crate::progress::Progress;
use crate::progress::ProgressSink;

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Summed play time of one batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchTotal {
    pub match_count: usize,
    pub total_seconds: u64,
}

impl BatchTotal {
    pub fn hours(&self) -> f64 {
        self.total_seconds as f64 / SECONDS_PER_HOUR
    }
}

/// Fetches match durations concurrently at a paced cadence and sums them
///
/// Each match detail request is dispatched as its own task after waiting one
/// pacing interval. Tasks share the client's rate limiter; the join at the end
/// is the only barrier. The first fatal error aborts every outstanding task
/// and the batch returns no partial total.
pub struct BatchAggregator {
    client: Arc<RiotClient>,
    clock: Arc<dyn Clock>,
    policy: PacingPolicy,
    progress: Arc<dyn ProgressSink>,
    long_window: Option<Arc<dyn RateLimiter>>,
}

impl BatchAggregator {
    pub fn new(client: Arc<RiotClient>, clock: Arc<dyn Clock>, policy: PacingPolicy, progress: Arc<dyn ProgressSink>) -> Self {
        Self { client, clock, policy, progress, long_window: None }
    }

    /// Choose pacing from what is left of this long-window budget when a batch
    /// starts, instead of its full limit
    pub fn with_long_window(mut self, long_window: Arc<dyn RateLimiter>) -> Self {
        self.long_window = Some(long_window);
        self
    }

    fn pacing(&self, match_count: usize) -> Pacing {
        match &self.long_window {
            Some(long_window) => self.policy.select_within(match_count, long_window.available()),
            None => self.policy.select(match_count),
        }
    }

    pub async fn sum_durations(&self, server: &str, match_ids: &[MatchId]) -> Result<BatchTotal> {
        let total = match_ids.len();
        let pacing = self.pacing(total);
        info!("Starting to sum {total} match durations");
        debug!(mode = ?pacing.mode, interval = ?pacing.interval, "Pacing selected");
        self.progress.on_start(total, &pacing);

        let server: Arc<str> = Arc::from(server);
        let mut tasks: JoinSet<pt_http::Result<MatchDuration>> = JoinSet::new();
        let mut total_seconds = 0u64;

        for (index, match_id) in match_ids.iter().enumerate() {
            if progress::should_report(index) {
                self.progress.on_progress(&Progress::estimate(index, total, &pacing));
            }

            self.clock.sleep(pacing.interval).await;

            // Surface failures from finished tasks before dispatching more
            while let Some(joined) = tasks.try_join_next() {
                total_seconds = add_duration(total_seconds, joined??)?;
            }

            let client = Arc::clone(&self.client);
            let server = Arc::clone(&server);
            let match_id = match_id.clone();
            tasks.spawn(async move { client.fetch_match_duration(&server, &match_id).await });
        }

        while let Some(joined) = tasks.join_next().await {
            total_seconds = add_duration(total_seconds, joined??)?;
        }

        let batch = BatchTotal { match_count: total, total_seconds };
        debug!(total_seconds, hours = batch.hours(), "Batch complete");
        Ok(batch)
    }
}

fn add_duration(total_seconds: u64, duration: MatchDuration) -> Result<u64> {
    let secs = duration.as_secs();
    total_seconds
        .checked_add(secs)
        .ok_or_else(|| HttpError::MalformedResponse(format!("total play time overflows: {total_seconds} + {secs} seconds")).into())
}
