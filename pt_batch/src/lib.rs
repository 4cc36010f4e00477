//! # pt_batch
//!
//! Paced, concurrent aggregation of match durations under the Riot rate limits

pub mod aggregator;
pub mod errors;
pub mod pacing;
pub mod pagination;
pub mod progress;

pub use aggregator::BatchAggregator;
pub use aggregator::BatchTotal;
pub use errors::BatchError;
pub use errors::Result;
pub use pacing::Pacing;
pub use pacing::PacingMode;
pub use pacing::PacingPolicy;
pub use pagination::collect_match_ids;
pub use progress::Progress;
pub use progress::ProgressSink;
