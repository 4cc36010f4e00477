use std::fmt;

/// Result type for rate limiting operations
pub type Result<T> = std::result::Result<T, RateLimitError>;

/// Errors that can occur during rate limiting operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitError {
    /// No quota left in the window right now
    Exceeded,

    /// Invalid configuration
    InvalidConfig(&'static str),

    /// Internal bookkeeping reached a state that should be unreachable
    Internal(&'static str),
}

impl fmt::Display for RateLimitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateLimitError::Exceeded => write!(f, "Rate limit exceeded"),
            RateLimitError::InvalidConfig(msg) => write!(f, "Invalid rate limiter configuration: {}", msg),
            RateLimitError::Internal(msg) => write!(f, "Rate limiter invariant violated: {}", msg),
        }
    }
}

impl std::error::Error for RateLimitError {}
