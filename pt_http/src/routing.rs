//! Server region → routing cluster lookup
//!
//! Profile data lives on per-server hosts (`na1`, `euw1`, ...), match data on
//! the continental cluster that owns the server.

use std::fmt;

use crate::errors::HttpError;
use crate::errors::Result;

/// Continental routing cluster for match data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cluster {
    Americas,
    Asia,
    Europe,
}

impl Cluster {
    /// Host label of the cluster, e.g. `americas` in `americas.api.riotgames.com`
    pub const fn as_str(self) -> &'static str {
        match self {
            Cluster::Americas => "americas",
            Cluster::Asia => "asia",
            Cluster::Europe => "europe",
        }
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const ROUTING_TABLE: [(&str, Cluster); 11] = [
    ("br1", Cluster::Americas),
    ("eun1", Cluster::Europe),
    ("euw1", Cluster::Europe),
    ("jp1", Cluster::Asia),
    ("kr", Cluster::Asia),
    ("la1", Cluster::Americas),
    ("la2", Cluster::Americas),
    ("na1", Cluster::Americas),
    ("oc1", Cluster::Americas),
    ("ru", Cluster::Europe),
    ("tr1", Cluster::Europe),
];

/// Server codes with a known cluster
pub fn known_servers() -> impl Iterator<Item = &'static str> {
    ROUTING_TABLE.iter().map(|(server, _)| *server)
}

/// Resolve the routing cluster for a server code, ignoring case
pub fn route_for(server: &str) -> Result<Cluster> {
    ROUTING_TABLE
        .iter()
        .find(|(code, _)| code.eq_ignore_ascii_case(server))
        .map(|(_, cluster)| *cluster)
        .ok_or_else(|| HttpError::UnknownRegion { server: server.to_string(), known: known_servers().collect::<Vec<_>>().join(", ") })
}
