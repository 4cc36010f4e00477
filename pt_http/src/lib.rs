pub mod client;
pub mod errors;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;
pub mod models;
pub mod riot;
pub mod routing;

pub use client::HttpClient;
pub use client::HttpClientConfig;
pub use client::HttpTransport;
pub use client::RawResponse;
pub use errors::HttpError;
pub use errors::Result;
pub use models::MatchDuration;
pub use models::MatchId;
pub use models::Summoner;
pub use riot::RiotClient;
pub use riot::RiotClientBuilder;
pub use routing::route_for;
pub use routing::Cluster;
