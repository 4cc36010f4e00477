use std::fmt;
use std::sync::Arc;

use anyhow::Context;
use pt_batch::collect_match_ids;
use pt_batch::BatchAggregator;
use pt_batch::BatchError;
use pt_batch::BatchTotal;
use pt_batch::PacingPolicy;
use pt_http::HttpClient;
use pt_http::RiotClient;
use pt_http::Summoner;
use pt_ratelimit::presets::riot;
use pt_ratelimit::Clock;
use pt_ratelimit::TokioClock;
use thiserror::Error;
use tracing::info;

use crate::config_loader::Settings;
use crate::presentation::format_hours;
use crate::presentation::LogProgress;

/// Step of a playtime query; failures are labelled with it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    SummonerLookup,
    MatchListing,
    DurationSummation,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::SummonerLookup => write!(f, "Failed to get summoner"),
            Stage::MatchListing => write!(f, "Failed to get matches"),
            Stage::DurationSummation => write!(f, "Failed to sum time"),
        }
    }
}

#[derive(Debug, Error)]
#[error("{stage}: {source}")]
pub struct StageError {
    pub stage: Stage,
    pub source: BatchError,
}

impl StageError {
    fn at(stage: Stage) -> impl FnOnce(BatchError) -> Self {
        move |source| Self { stage, source }
    }
}

/// Outcome of one successful query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaytimeReport {
    pub summoner: Summoner,
    pub total: BatchTotal,
}

impl PlaytimeReport {
    pub fn hours(&self) -> f64 {
        self.total.hours()
    }
}

impl fmt::Display for PlaytimeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} has played League Of Legends for {}", self.summoner.name, format_hours(self.hours()))
    }
}

/// Summoner lookup, match listing and duration summation against one client
pub struct Playtime {
    client: Arc<RiotClient>,
    aggregator: BatchAggregator,
    page_size: u32,
}

impl Playtime {
    /// `aggregator` should dispatch through the same `client`
    pub fn new(client: Arc<RiotClient>, aggregator: BatchAggregator, page_size: u32) -> Self {
        Self { client, aggregator, page_size }
    }

    /// Real HTTP client, tokio clock and log-rendered progress
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let clock: Arc<dyn Clock> = Arc::new(TokioClock::new());
        let short = settings.limits.short_budget();
        let long = settings.limits.long_budget();

        let limiter = riot::dual_window(short, long, Arc::clone(&clock)).context("Invalid rate limits")?;
        let long_window = riot::long_window(&limiter).context("Rate limiter has no long window")?;
        let transport = HttpClient::with_config(settings.http_config()).context("Failed to build HTTP client")?;
        let client = RiotClient::builder()
            .transport(Arc::new(transport))
            .rate_limiter(Arc::new(limiter))
            .clock(Arc::clone(&clock))
            .api_key(settings.api_key.clone())
            .scheme(settings.api.scheme.clone())
            .api_domain(settings.api.domain.clone())
            .retry_delay(settings.retry_delay())
            .build()
            .context("Failed to build Riot API client")?;

        let client = Arc::new(client);
        let aggregator = BatchAggregator::new(Arc::clone(&client), clock, PacingPolicy::from_budgets(short, long), Arc::new(LogProgress)).with_long_window(long_window);

        Ok(Self::new(client, aggregator, settings.api.page_size))
    }

    pub async fn run(&self, server: &str, summoner_name: &str) -> Result<PlaytimeReport, StageError> {
        let summoner = self.client.fetch_summoner(server, summoner_name).await.map_err(BatchError::from).map_err(StageError::at(Stage::SummonerLookup))?;
        info!("Found Summoner '{}' with puuid '{}'", summoner.name, summoner.puuid);

        let match_ids = collect_match_ids(&self.client, server, &summoner.puuid, self.page_size)
            .await
            .map_err(BatchError::from)
            .map_err(StageError::at(Stage::MatchListing))?;
        info!("Found {} matches", match_ids.len());

        let total = self.aggregator.sum_durations(server, &match_ids).await.map_err(StageError::at(Stage::DurationSummation))?;

        Ok(PlaytimeReport { summoner, total })
    }
}

#[cfg(test)]
mod tests {
    use pt_http::HttpError;

    use super::*;

    #[test]
    fn test_stage_error_messages() {
        let err = StageError { stage: Stage::SummonerLookup, source: BatchError::Fetch(HttpError::Status { status: 404, url: "u".to_string() }) };
        assert!(err.to_string().starts_with("Failed to get summoner: "));

        let err = StageError { stage: Stage::MatchListing, source: BatchError::Fetch(HttpError::MalformedResponse("x".to_string())) };
        assert!(err.to_string().starts_with("Failed to get matches: "));

        let err = StageError { stage: Stage::DurationSummation, source: BatchError::Fetch(HttpError::Misconfigured("x")) };
        assert!(err.to_string().starts_with("Failed to sum time: "));
    }

    #[test]
    fn test_report_sentence() {
        let report = PlaytimeReport {
            summoner: Summoner { name: "Faker".to_string(), puuid: "p".to_string() },
            total: BatchTotal { match_count: 3, total_seconds: 6600 },
        };

        assert_eq!(report.to_string(), "Faker has played League Of Legends for 1h 49m");
    }
}
