//! Riot Games API rate limit presets
//!
//! Riot enforces two application rate limits per API key at the same time:
//! - a short window (development keys: 20 requests per second)
//! - a long window (development keys: 100 requests per 2 minutes)
//!
//! Reference: https://developer.riotgames.com/docs/portal#web-apis_rate-limiting

use std::sync::Arc;
use std::time::Duration;

use crate::error::Result;
use crate::time::Clock;
use crate::MultiLimiter;
use crate::RateLimiter;
use crate::SlidingWindow;

/// Requests allowed in the short window for a development key
pub const SHORT_WINDOW_LIMIT: u32 = 20;

/// Short window length
pub const SHORT_WINDOW: Duration = Duration::from_secs(1);

/// Requests allowed in the long window for a development key
pub const LONG_WINDOW_LIMIT: u32 = 100;

/// Long window length
pub const LONG_WINDOW: Duration = Duration::from_secs(120);

/// One request budget: `limit` uses per `window`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Budget {
    pub limit: u32,
    pub window: Duration,
}

impl Budget {
    pub const fn new(limit: u32, window: Duration) -> Self {
        Self { limit, window }
    }
}

/// Short-window budget of a development key
pub const DEVELOPMENT_SHORT: Budget = Budget::new(SHORT_WINDOW_LIMIT, SHORT_WINDOW);

/// Long-window budget of a development key
pub const DEVELOPMENT_LONG: Budget = Budget::new(LONG_WINDOW_LIMIT, LONG_WINDOW);

/// Limits for a development API key (20/1s and 100/120s)
pub fn development_key_limits(clock: Arc<dyn Clock>) -> Result<MultiLimiter> {
    dual_window(DEVELOPMENT_SHORT, DEVELOPMENT_LONG, clock)
}

/// Short window first, then long window, both on the same clock
pub fn dual_window(short: Budget, long: Budget, clock: Arc<dyn Clock>) -> Result<MultiLimiter> {
    Ok(MultiLimiter::builder()
        .with_limiter(SlidingWindow::new(short.limit, short.window, Arc::clone(&clock))?)
        .with_limiter(SlidingWindow::new(long.limit, long.window, clock)?)
        .build())
}

/// The long-window budget of a limiter built by [`dual_window`] or
/// [`development_key_limits`], which is always the last one added
pub fn long_window(limiter: &MultiLimiter) -> Option<Arc<dyn RateLimiter>> {
    limiter.limiters().last().cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RateLimitError;
    use crate::time::ManualClock;

    #[test]
    fn test_development_key_limits() {
        let limiter = development_key_limits(Arc::new(ManualClock::new())).unwrap();

        assert_eq!(limiter.len(), 2);
        assert_eq!(limiter.capacity(), SHORT_WINDOW_LIMIT);

        for _ in 0..SHORT_WINDOW_LIMIT {
            limiter.try_acquire().unwrap();
        }
        assert_eq!(limiter.try_acquire(), Err(RateLimitError::Exceeded));
    }

    #[test]
    fn test_dual_window_rejects_zero_limit() {
        let result = dual_window(Budget::new(0, SHORT_WINDOW), DEVELOPMENT_LONG, Arc::new(ManualClock::new()));
        assert!(matches!(result, Err(RateLimitError::InvalidConfig(_))));
    }

    #[test]
    fn test_independent_instances() {
        let clock: Arc<dyn Clock> = Arc::new(ManualClock::new());
        let first = development_key_limits(Arc::clone(&clock)).unwrap();
        let second = development_key_limits(clock).unwrap();

        for _ in 0..SHORT_WINDOW_LIMIT {
            first.try_acquire().unwrap();
        }

        assert_eq!(first.available(), 0);
        assert_eq!(second.available(), SHORT_WINDOW_LIMIT);
    }

    #[test]
    fn test_long_window_handle_tracks_long_budget() {
        let limiter = development_key_limits(Arc::new(ManualClock::new())).unwrap();
        let long = long_window(&limiter).unwrap();

        for _ in 0..3 {
            limiter.try_acquire().unwrap();
        }

        assert_eq!(long.capacity(), LONG_WINDOW_LIMIT);
        assert_eq!(long.available(), LONG_WINDOW_LIMIT - 3);
        assert_eq!(limiter.available(), SHORT_WINDOW_LIMIT - 3);
    }

    #[test]
    fn test_long_window_of_empty_limiter() {
        assert!(long_window(&MultiLimiter::builder().build()).is_none());
    }
}
