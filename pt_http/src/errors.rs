use pt_ratelimit::RateLimitError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HttpError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Unknown server region '{server}' (expected one of: {known})")]
    UnknownRegion { server: String, known: String },

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Malformed response: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Client misconfigured: {0}")]
    Misconfigured(&'static str),

    #[error("Rate limiter failure: {0}")]
    RateLimit(#[from] RateLimitError),
}

impl HttpError {
    /// HTTP status code, when the failure came from a non-2xx response
    pub fn status(&self) -> Option<u16> {
        match self {
            HttpError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, HttpError>;
