use std::future::Future;
use std::pin::Pin;

use crate::error::Result;

/// Core trait for all rate limiting implementations
///
/// Every call against the remote API consumes exactly one use, so there is no
/// weight parameter.
pub trait RateLimiter: Send + Sync {
    /// Record one use if quota is available right now, without waiting
    fn try_acquire(&self) -> Result<()>;

    /// Wait until one use is permitted, then record it
    fn acquire(&self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;

    /// Number of uses that could be recorded right now
    fn available(&self) -> u32;

    /// Maximum number of uses per window
    fn capacity(&self) -> u32;

    /// Forget all recorded uses
    fn reset(&self);
}
