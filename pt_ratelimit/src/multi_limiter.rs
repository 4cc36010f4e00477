use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::RateLimitError;
use crate::error::Result;
use crate::limiter::RateLimiter;

/// Coordinator for multiple simultaneous rate limiters
///
/// The Riot API enforces two budgets at once per API key:
/// - 20 requests per second
/// - 100 requests per two minutes
///
/// A request may only be sent once every limiter has admitted it. Limiters
/// are always acquired in the order they were added, so the short window is
/// waited on before the long one.
pub struct MultiLimiter {
    limiters: Vec<Arc<dyn RateLimiter>>,
}

impl MultiLimiter {
    /// Create a new multi-limiter builder
    pub fn builder() -> MultiLimiterBuilder {
        MultiLimiterBuilder::new()
    }

    /// Number of composed limiters
    pub fn len(&self) -> usize {
        self.limiters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.limiters.is_empty()
    }

    /// Composed limiters in acquisition order
    pub fn limiters(&self) -> &[Arc<dyn RateLimiter>] {
        &self.limiters
    }
}

impl RateLimiter for MultiLimiter {
    /// Best-effort all-or-nothing: every limiter is checked for headroom
    /// before any of them records the use.
    fn try_acquire(&self) -> Result<()> {
        if self.limiters.iter().any(|limiter| limiter.available() == 0) {
            return Err(RateLimitError::Exceeded);
        }

        for limiter in &self.limiters {
            limiter.try_acquire()?;
        }

        Ok(())
    }

    fn acquire(&self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            for limiter in &self.limiters {
                limiter.acquire().await?;
            }

            Ok(())
        })
    }

    fn available(&self) -> u32 {
        self.limiters.iter().map(|l| l.available()).min().unwrap_or(u32::MAX)
    }

    fn capacity(&self) -> u32 {
        self.limiters.iter().map(|l| l.capacity()).min().unwrap_or(u32::MAX)
    }

    fn reset(&self) {
        for limiter in &self.limiters {
            limiter.reset();
        }
    }
}

/// Builder for creating a multi-limiter
#[derive(Default)]
pub struct MultiLimiterBuilder {
    limiters: Vec<Arc<dyn RateLimiter>>,
}

impl MultiLimiterBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rate limiter to the multi-limiter
    ///
    /// Limiters are acquired in the order they are added.
    pub fn with_limiter<L: RateLimiter + 'static>(mut self, limiter: L) -> Self {
        self.limiters.push(Arc::new(limiter));
        self
    }

    /// Add an Arc-wrapped rate limiter, e.g. one shared with another composite
    pub fn with_limiter_arc(mut self, limiter: Arc<dyn RateLimiter>) -> Self {
        self.limiters.push(limiter);
        self
    }

    /// Build the multi-limiter
    pub fn build(self) -> MultiLimiter {
        MultiLimiter { limiters: self.limiters }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::time::Clock;
    use crate::time::ManualClock;
    use crate::window::SlidingWindow;

    fn window(limit: u32, secs: u64, clock: &Arc<ManualClock>) -> SlidingWindow {
        SlidingWindow::new(limit, Duration::from_secs(secs), clock.clone()).unwrap()
    }

    #[test]
    fn test_empty_multi_limiter() {
        let limiter = MultiLimiter::builder().build();

        assert!(limiter.is_empty());
        assert!(limiter.try_acquire().is_ok());
        assert_eq!(limiter.available(), u32::MAX);
    }

    #[test]
    fn test_most_restrictive_wins() {
        let clock = Arc::new(ManualClock::new());
        let limiter = MultiLimiter::builder().with_limiter(window(20, 1, &clock)).with_limiter(window(5, 120, &clock)).build();

        assert_eq!(limiter.len(), 2);
        assert_eq!(limiter.capacity(), 5);

        for _ in 0..5 {
            limiter.try_acquire().unwrap();
        }
        assert_eq!(limiter.available(), 0);
        assert_eq!(limiter.try_acquire(), Err(RateLimitError::Exceeded));
    }

    #[test]
    fn test_all_or_nothing() {
        let clock = Arc::new(ManualClock::new());
        let short: Arc<dyn RateLimiter> = Arc::new(window(20, 1, &clock));
        let long: Arc<dyn RateLimiter> = Arc::new(window(1, 120, &clock));
        let limiter = MultiLimiter::builder().with_limiter_arc(short.clone()).with_limiter_arc(long).build();

        limiter.try_acquire().unwrap();
        assert_eq!(limiter.try_acquire(), Err(RateLimitError::Exceeded));

        // The short window was not charged for the rejected attempt
        assert_eq!(short.available(), 19);
    }

    #[test]
    fn test_reset_all() {
        let clock = Arc::new(ManualClock::new());
        let limiter = MultiLimiter::builder().with_limiter(window(10, 1, &clock)).with_limiter(window(10, 120, &clock)).build();

        for _ in 0..5 {
            limiter.try_acquire().unwrap();
        }
        assert_eq!(limiter.available(), 5);

        limiter.reset();
        assert_eq!(limiter.available(), 10);
    }

    #[tokio::test]
    async fn test_long_window_blocks_after_short_window_drains() {
        let clock = Arc::new(ManualClock::new());
        let limiter = MultiLimiter::builder().with_limiter(window(20, 1, &clock)).with_limiter(window(100, 120, &clock)).build();

        for _ in 0..100 {
            limiter.acquire().await.unwrap();
        }
        // 100 calls need four one-second waits on the short window
        assert_eq!(clock.now(), Duration::from_secs(4));

        limiter.acquire().await.unwrap();

        // The 101st call clears the short window at 5s, then waits for the first use to leave the two-minute window
        assert_eq!(clock.now(), Duration::from_secs(120));
        assert_eq!(clock.sleeps().last(), Some(&Duration::from_secs(115)));
    }
}
