use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::debug;

use crate::error::RateLimitError;
use crate::error::Result;
use crate::limiter::RateLimiter;
use crate::time::Clock;

/// Sliding window rate limiter
///
/// A use recorded at time `t` counts against the budget until `t + window`.
/// Uses therefore drain one at a time as they age out rather than all at
/// once at a window boundary, and no interval of length `window` can ever
/// contain more than `limit` uses.
///
/// Waiters are served strictly in arrival order: `acquire` first takes a
/// fair (FIFO) async turnstile, then inspects the shared state under a short
/// synchronous lock that is never held across an await point.
pub struct SlidingWindow {
    /// Timestamps of the uses still inside the window, oldest first
    state: Mutex<VecDeque<Duration>>,

    /// Queue for callers waiting on `acquire`
    turnstile: tokio::sync::Mutex<()>,

    /// Maximum uses per window
    limit: u32,

    /// Window length
    window: Duration,

    clock: Arc<dyn Clock>,
}

impl SlidingWindow {
    /// Create a new sliding window limiter
    pub fn new(limit: u32, window: Duration, clock: Arc<dyn Clock>) -> Result<Self> {
        if limit == 0 {
            return Err(RateLimitError::InvalidConfig("limit must be greater than 0"));
        }
        if window.is_zero() {
            return Err(RateLimitError::InvalidConfig("window duration must be greater than 0"));
        }

        Ok(Self {
            state: Mutex::new(VecDeque::with_capacity(limit.min(1024) as usize)),
            turnstile: tokio::sync::Mutex::new(()),
            limit,
            window,
            clock,
        })
    }

    /// Create a limiter with a one second window
    pub fn per_second(limit: u32, clock: Arc<dyn Clock>) -> Result<Self> {
        Self::new(limit, Duration::from_secs(1), clock)
    }

    /// Create a builder for configuring a sliding window limiter
    pub fn builder() -> SlidingWindowBuilder {
        SlidingWindowBuilder::new()
    }

    /// Window length
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Number of uses currently counted against the window
    pub fn uses_in_window(&self) -> u32 {
        let mut uses = self.state.lock();
        Self::evict_expired(&mut uses, self.clock.now(), self.window);
        uses.len() as u32
    }

    /// Timestamp of the oldest use still inside the window
    pub fn window_start(&self) -> Option<Duration> {
        let mut uses = self.state.lock();
        Self::evict_expired(&mut uses, self.clock.now(), self.window);
        uses.front().copied()
    }

    #[inline]
    fn evict_expired(uses: &mut VecDeque<Duration>, now: Duration, window: Duration) {
        while let Some(&oldest) = uses.front() {
            if now.saturating_sub(oldest) < window {
                break;
            }
            uses.pop_front();
        }
    }

    /// Record a use if there is room, otherwise return how long to wait
    fn record_or_wait(&self) -> Result<Option<Duration>> {
        let mut uses = self.state.lock();
        let now = self.clock.now();
        Self::evict_expired(&mut uses, now, self.window);

        if uses.len() < self.limit as usize {
            uses.push_back(now);
            return Ok(None);
        }

        let oldest = uses.front().copied().ok_or(RateLimitError::Internal("full window holds no uses"))?;
        let wait = (oldest + self.window).saturating_sub(now);
        if wait.is_zero() {
            return Err(RateLimitError::Internal("expired use survived eviction"));
        }

        Ok(Some(wait))
    }
}

impl RateLimiter for SlidingWindow {
    fn try_acquire(&self) -> Result<()> {
        // Someone is queued on acquire; don't overtake them.
        let Ok(_turn) = self.turnstile.try_lock() else {
            return Err(RateLimitError::Exceeded);
        };

        match self.record_or_wait()? {
            None => Ok(()),
            Some(_) => Err(RateLimitError::Exceeded),
        }
    }

    fn acquire(&self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            let _turn = self.turnstile.lock().await;

            while let Some(wait) = self.record_or_wait()? {
                debug!(limit = self.limit, window = ?self.window, "Waiting for {:.2} seconds", wait.as_secs_f64());
                self.clock.sleep(wait).await;
            }

            Ok(())
        })
    }

    fn available(&self) -> u32 {
        self.limit.saturating_sub(self.uses_in_window())
    }

    fn capacity(&self) -> u32 {
        self.limit
    }

    fn reset(&self) {
        self.state.lock().clear();
    }
}

/// Builder for configuring a sliding window limiter
#[derive(Default)]
pub struct SlidingWindowBuilder {
    limit: Option<u32>,
    window: Option<Duration>,
    clock: Option<Arc<dyn Clock>>,
}

impl SlidingWindowBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the limit (max uses per window)
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set the window duration
    pub fn window(mut self, window: Duration) -> Self {
        self.window = Some(window);
        self
    }

    /// Set the clock used for timestamps and waiting
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Build the limiter
    pub fn build(self) -> Result<SlidingWindow> {
        let limit = self.limit.ok_or(RateLimitError::InvalidConfig("limit must be set"))?;
        let window = self.window.ok_or(RateLimitError::InvalidConfig("window must be set"))?;
        let clock = self.clock.ok_or(RateLimitError::InvalidConfig("clock must be set"))?;
        SlidingWindow::new(limit, window, clock)
    }
}
