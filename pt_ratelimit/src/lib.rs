pub mod error;
pub mod limiter;
pub mod multi_limiter;
pub mod presets;
pub mod time;
pub mod window;

pub use error::RateLimitError;
pub use error::Result;
pub use limiter::RateLimiter;
pub use multi_limiter::MultiLimiter;
pub use multi_limiter::MultiLimiterBuilder;
pub use time::Clock;
pub use time::ManualClock;
pub use time::TokioClock;
pub use window::SlidingWindow;
pub use window::SlidingWindowBuilder;
