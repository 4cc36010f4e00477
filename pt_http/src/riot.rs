use std::sync::Arc;
use std::time::Duration;

use pt_ratelimit::Clock;
use pt_ratelimit::RateLimiter;
use tracing::debug;
use url::Url;

use crate::client::HttpTransport;
use crate::client::RawResponse;
use crate::errors::HttpError;
use crate::errors::Result;
use crate::models::MatchDetail;
use crate::models::MatchDuration;
use crate::models::MatchId;
use crate::models::Summoner;
use crate::routing::route_for;

pub const RIOT_TOKEN_HEADER: &str = "X-Riot-Token";
pub const RIOT_API_DOMAIN: &str = "api.riotgames.com";

/// Largest page match-v5 will return
pub const MAX_PAGE_SIZE: u32 = 100;

/// Pause before retrying a match detail request that got 429
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(5);

const TOO_MANY_REQUESTS: u16 = 429;

/// Riot Games REST client for summoner and match data
///
/// Every request first waits on the shared rate limiter. Only match detail
/// requests retry on 429; everything else surfaces non-2xx as
/// [`HttpError::Status`].
pub struct RiotClient {
    transport: Arc<dyn HttpTransport>,
    rate_limiter: Arc<dyn RateLimiter>,
    clock: Arc<dyn Clock>,
    headers: Vec<(&'static str, String)>,
    scheme: String,
    api_domain: String,
    retry_delay: Duration,
}

impl RiotClient {
    /// Create a new client builder
    pub fn builder() -> RiotClientBuilder {
        RiotClientBuilder::default()
    }

    /// Look up a summoner by display name on a server (`euw1`, `na1`, ...)
    pub async fn fetch_summoner(&self, server: &str, summoner_name: &str) -> Result<Summoner> {
        debug!("Querying summoner '{summoner_name}' in server region '{server}'");

        let host = server.to_ascii_lowercase();
        let url = self.endpoint(&host, &["lol", "summoner", "v4", "summoners", "by-name", summoner_name], &[])?;
        let response = self.send(&url).await?;

        let summoner: Summoner = serde_json::from_slice(&response.body)?;
        Ok(summoner)
    }

    /// One page of match ids, most recent first
    ///
    /// A page shorter than `count` means the history is exhausted.
    pub async fn fetch_match_id_page(&self, server: &str, puuid: &str, start: u32, count: u32) -> Result<Vec<MatchId>> {
        let cluster = route_for(server)?;
        let url = self.endpoint(
            cluster.as_str(),
            &["lol", "match", "v5", "matches", "by-puuid", puuid, "ids"],
            &[("start", start.to_string()), ("count", count.to_string())],
        )?;
        let response = self.send(&url).await?;

        let page: Vec<MatchId> = serde_json::from_slice(&response.body)?;
        debug!(start, count, received = page.len(), "Fetched match id page for '{puuid}'");
        Ok(page)
    }

    /// Duration of a single match
    ///
    /// A 429 is retried after the configured delay for as long as the API keeps
    /// throttling; there is no retry ceiling.
    pub async fn fetch_match_duration(&self, server: &str, match_id: &MatchId) -> Result<MatchDuration> {
        debug!("Querying match '{match_id}' in server region '{server}'");

        let cluster = route_for(server)?;
        let url = self.endpoint(cluster.as_str(), &["lol", "match", "v5", "matches", match_id.as_str()], &[])?;

        let mut attempt = 0u32;
        loop {
            attempt += 1;
            self.rate_limiter.acquire().await?;
            let response = self.transport.get(&url, &self.headers).await?;

            if response.status == TOO_MANY_REQUESTS {
                debug!(%match_id, attempt, "Rate limit exceeded. Trying again in {:?}", self.retry_delay);
                self.clock.sleep(self.retry_delay).await;
                continue;
            }

            let response = Self::check_status(&url, response)?;
            let detail: MatchDetail = serde_json::from_slice(&response.body)?;
            return detail.duration();
        }
    }

    /// Acquire the limiter, send, and reject any non-2xx
    async fn send(&self, url: &Url) -> Result<RawResponse> {
        self.rate_limiter.acquire().await?;
        let response = self.transport.get(url, &self.headers).await?;
        Self::check_status(url, response)
    }

    fn check_status(url: &Url, response: RawResponse) -> Result<RawResponse> {
        if !response.is_success() {
            return Err(HttpError::Status { status: response.status, url: url.to_string() });
        }
        Ok(response)
    }

    /// `{scheme}://{host}.{domain}/{segments...}?{query}`, segments percent-encoded
    fn endpoint(&self, host: &str, segments: &[&str], query: &[(&str, String)]) -> Result<Url> {
        let mut url = Url::parse(&format!("{}://{}.{}", self.scheme, host, self.api_domain))?;

        url.path_segments_mut().map_err(|()| HttpError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?.extend(segments);

        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }

        Ok(url)
    }
}

/// Builder for [`RiotClient`]
pub struct RiotClientBuilder {
    transport: Option<Arc<dyn HttpTransport>>,
    rate_limiter: Option<Arc<dyn RateLimiter>>,
    clock: Option<Arc<dyn Clock>>,
    api_key: Option<String>,
    scheme: String,
    api_domain: String,
    retry_delay: Duration,
}

impl Default for RiotClientBuilder {
    fn default() -> Self {
        Self {
            transport: None,
            rate_limiter: None,
            clock: None,
            api_key: None,
            scheme: "https".to_string(),
            api_domain: RIOT_API_DOMAIN.to_string(),
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }
}

impl RiotClientBuilder {
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn rate_limiter(mut self, rate_limiter: Arc<dyn RateLimiter>) -> Self {
        self.rate_limiter = Some(rate_limiter);
        self
    }

    /// Clock used for 429 backoff
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Sent as `X-Riot-Token` on every request
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    /// Domain appended to the server or cluster host label
    pub fn api_domain(mut self, api_domain: impl Into<String>) -> Self {
        self.api_domain = api_domain.into();
        self
    }

    pub fn retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    pub fn build(self) -> Result<RiotClient> {
        let transport = self.transport.ok_or(HttpError::Misconfigured("transport must be set"))?;
        let rate_limiter = self.rate_limiter.ok_or(HttpError::Misconfigured("rate limiter must be set"))?;
        let clock = self.clock.ok_or(HttpError::Misconfigured("clock must be set"))?;
        let api_key = self.api_key.ok_or(HttpError::Misconfigured("API key must be set"))?;

        Ok(RiotClient {
            transport,
            rate_limiter,
            clock,
            headers: vec![(RIOT_TOKEN_HEADER, api_key)],
            scheme: self.scheme,
            api_domain: self.api_domain,
            retry_delay: self.retry_delay,
        })
    }
}
