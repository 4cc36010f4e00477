use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;

/// Source of time and sleeping for limiters, fetchers and the batch dispatcher
///
/// Injected everywhere a component waits, so tests can drive a simulated clock
/// instead of sleeping for real.
pub trait Clock: Send + Sync {
    /// Time elapsed since the clock's epoch
    fn now(&self) -> Duration;

    /// Suspend the caller for `duration`
    fn sleep(&self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + '_>>;
}

/// Clock backed by tokio's timer
///
/// Uses `tokio::time::Instant`, so a runtime started with paused time
/// (`#[tokio::test(start_paused = true)]`) advances it automatically.
#[derive(Debug, Clone, Copy)]
pub struct TokioClock {
    /// Epoch for relative time measurements
    epoch: Instant,
}

impl TokioClock {
    /// Create a clock with the current instant as epoch
    pub fn new() -> Self {
        Self { epoch: Instant::now() }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TokioClock {
    #[inline]
    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }

    fn sleep(&self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(tokio::time::sleep(duration))
    }
}

/// Simulated clock
///
/// `sleep` advances virtual time by the requested amount, records it and
/// yields once to the scheduler so other tasks get a chance to run.
///
/// There is one shared timeline and sleeps do not overlap: two tasks that each
/// sleep 5 s concurrently move the clock forward by 10 s. Use it to count and
/// sum sleeps. Assertions about the spacing between concurrent events need
/// `TokioClock` under paused tokio time instead.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Mutex<Duration>,
    sleeps: Mutex<Vec<Duration>>,
}

impl ManualClock {
    /// Create a clock at time zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Move virtual time forward without recording a sleep
    pub fn advance(&self, by: Duration) {
        *self.now.lock() += by;
    }

    /// Every sleep requested so far, in order
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().clone()
    }

    /// Total time spent sleeping
    pub fn slept(&self) -> Duration {
        self.sleeps.lock().iter().sum()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        *self.now.lock()
    }

    fn sleep(&self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(async move {
            self.sleeps.lock().push(duration);
            self.advance(duration);
            tokio::task::yield_now().await;
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_tokio_clock_follows_paused_time() {
        let clock = TokioClock::new();
        let t1 = clock.now();

        clock.sleep(Duration::from_secs(3)).await;

        assert!(clock.now() - t1 >= Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_manual_clock_records_sleeps() {
        let clock = ManualClock::new();
        assert_eq!(clock.now(), Duration::ZERO);

        clock.sleep(Duration::from_millis(250)).await;
        clock.advance(Duration::from_millis(50));
        clock.sleep(Duration::from_secs(5)).await;

        assert_eq!(clock.now(), Duration::from_millis(5300));
        assert_eq!(clock.sleeps(), vec![Duration::from_millis(250), Duration::from_secs(5)]);
        assert_eq!(clock.slept(), Duration::from_millis(5250));
    }

    #[tokio::test]
    async fn test_manual_clock_concurrent_sleeps_accumulate() {
        let clock = Arc::new(ManualClock::new());

        let first = tokio::spawn({
            let clock = Arc::clone(&clock);
            async move { clock.sleep(Duration::from_secs(5)).await }
        });
        let second = tokio::spawn({
            let clock = Arc::clone(&clock);
            async move { clock.sleep(Duration::from_secs(5)).await }
        });
        first.await.unwrap();
        second.await.unwrap();

        assert_eq!(clock.now(), Duration::from_secs(10));
        assert_eq!(clock.sleeps(), vec![Duration::from_secs(5); 2]);
    }
}
