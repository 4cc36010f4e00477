use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use bytes::Bytes;
use reqwest::Client;
use reqwest::ClientBuilder;
use url::Url;

use crate::errors::Result;

/// Configuration for HTTP client.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Maximum idle connections per host (default: 20)
    pub pool_max_idle_per_host: usize,

    /// Idle timeout for connections (default: 90s)
    pub pool_idle_timeout: Duration,

    /// Connection establishment timeout (default: 10s)
    pub connect_timeout: Duration,

    /// Total request timeout (default: 30s)
    pub request_timeout: Duration,

    /// TCP keepalive interval (default: 60s)
    pub tcp_keepalive: Duration,

    /// Enable TCP_NODELAY (default: true)
    pub tcp_nodelay: bool,

    /// Enable Hickory DNS for async resolution (default: true)
    pub hickory_dns: bool,

    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            pool_max_idle_per_host: 20,
            pool_idle_timeout: Duration::from_secs(90),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            tcp_keepalive: Duration::from_secs(60),
            tcp_nodelay: true,
            hickory_dns: true,
            user_agent: concat!("playtime/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl HttpClientConfig {
    /// Override both timeouts
    pub fn with_timeouts(mut self, connect_timeout: Duration, request_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self.request_timeout = request_timeout;
        self
    }
}

/// Status code and raw body of one HTTP response
///
/// Non-2xx responses are returned as values, not errors, so callers can tell
/// throttling (429) apart from other failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Bytes,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self { status, body: body.into() }
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A single authenticated GET
///
/// Only transport failures (DNS, TLS, timeouts) are errors here.
pub trait HttpTransport: Send + Sync {
    fn get<'a>(&'a self, url: &'a Url, headers: &'a [(&'static str, String)]) -> Pin<Box<dyn Future<Output = Result<RawResponse>> + Send + 'a>>;
}

pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
}

impl HttpClient {
    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            // Connection pooling
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .pool_idle_timeout(config.pool_idle_timeout)
            // TCP optimization
            .tcp_nodelay(config.tcp_nodelay)
            .tcp_keepalive(Some(config.tcp_keepalive))
            // Timeouts
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            // TLS with rustls
            .use_rustls_tls()
            .min_tls_version(reqwest::tls::Version::TLS_1_2)
            // Compression
            .gzip(true)
            .brotli(true)
            .hickory_dns(config.hickory_dns)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self { client, config })
    }

    /// Get the client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }
}

impl HttpTransport for HttpClient {
    fn get<'a>(&'a self, url: &'a Url, headers: &'a [(&'static str, String)]) -> Pin<Box<dyn Future<Output = Result<RawResponse>> + Send + 'a>> {
        Box::pin(async move {
            let mut request = self.client.get(url.clone());
            for (name, value) in headers {
                request = request.header(*name, value.as_str());
            }

            let response = request.send().await?;
            let status = response.status().as_u16();
            let body = response.bytes().await?;

            Ok(RawResponse { status, body })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HttpClientConfig::default();
        assert_eq!(config.pool_max_idle_per_host, 20);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(config.tcp_nodelay);
        assert!(config.user_agent.starts_with("playtime/"));
    }

    #[test]
    fn test_with_timeouts() {
        let config = HttpClientConfig::default().with_timeouts(Duration::from_secs(2), Duration::from_secs(7));
        assert_eq!(config.connect_timeout, Duration::from_secs(2));
        assert_eq!(config.request_timeout, Duration::from_secs(7));
    }

    #[test]
    fn test_raw_response_success_range() {
        assert!(RawResponse::new(200, "[]").is_success());
        assert!(RawResponse::new(204, Bytes::new()).is_success());
        assert!(!RawResponse::new(429, Bytes::new()).is_success());
        assert!(!RawResponse::new(404, Bytes::new()).is_success());
    }

    #[test]
    fn test_client_creation() {
        let client = HttpClient::with_config(HttpClientConfig::default().with_timeouts(Duration::from_secs(1), Duration::from_secs(1)));
        assert!(client.is_ok());
        assert_eq!(client.unwrap().config().request_timeout, Duration::from_secs(1));
    }
}
