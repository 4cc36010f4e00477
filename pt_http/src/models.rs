use std::fmt;

use serde::Deserialize;
use serde::Deserializer;

use crate::errors::HttpError;
use crate::errors::Result;

/// Player profile as returned by summoner-v4
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Summoner {
    /// Display name
    pub name: String,

    /// Globally unique player id used by match-v5
    pub puuid: String,
}

/// Opaque match identifier, e.g. `EUW1_6543210987`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(transparent)]
pub struct MatchId(String);

impl MatchId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Length of one match in whole seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct MatchDuration(u64);

impl MatchDuration {
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    pub const fn as_secs(self) -> u64 {
        self.0
    }
}

/// Subset of match-v5 match detail needed for the duration
#[derive(Debug, Deserialize)]
pub(crate) struct MatchDetail {
    info: MatchInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MatchInfo {
    game_duration: f64,

    /// Whether the key exists at all; its value is irrelevant
    #[serde(default, deserialize_with = "key_present")]
    game_end_timestamp: bool,
}

fn key_present<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    serde::de::IgnoredAny::deserialize(deserializer)?;
    Ok(true)
}

impl MatchDetail {
    /// Matches recorded before `gameEndTimestamp` was added to the payload
    /// report `gameDuration` in milliseconds; newer ones in seconds.
    pub(crate) fn duration(&self) -> Result<MatchDuration> {
        let raw = self.info.game_duration;
        if !raw.is_finite() || raw < 0.0 {
            return Err(HttpError::MalformedResponse(format!("info.gameDuration must be a non-negative number, got {raw}")));
        }

        // Casting would saturate at u64::MAX
        if raw >= u64::MAX as f64 {
            return Err(HttpError::MalformedResponse(format!("info.gameDuration is out of range, got {raw}")));
        }

        let raw = raw.trunc() as u64;
        let secs = if self.info.game_end_timestamp { raw } else { raw / 1000 };

        Ok(MatchDuration(secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn duration_of(json: &str) -> Result<MatchDuration> {
        let detail: MatchDetail = serde_json::from_str(json)?;
        detail.duration()
    }

    #[test]
    fn test_duration_in_seconds_with_end_timestamp() {
        let duration = duration_of(r#"{"info":{"gameDuration":1500,"gameEndTimestamp":123}}"#).unwrap();
        assert_eq!(duration, MatchDuration::from_secs(1500));
    }

    #[test]
    fn test_duration_in_millis_without_end_timestamp() {
        let duration = duration_of(r#"{"info":{"gameDuration":1500000}}"#).unwrap();
        assert_eq!(duration.as_secs(), 1500);
    }

    #[test]
    fn test_millis_are_truncated() {
        let duration = duration_of(r#"{"info":{"gameDuration":1500999}}"#).unwrap();
        assert_eq!(duration.as_secs(), 1500);
    }

    #[test]
    fn test_null_end_timestamp_still_counts_as_present() {
        let duration = duration_of(r#"{"info":{"gameDuration":1500,"gameEndTimestamp":null}}"#).unwrap();
        assert_eq!(duration.as_secs(), 1500);
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let json = r#"{"metadata":{"matchId":"EUW1_1"},"info":{"gameMode":"CLASSIC","gameDuration":1800.0,"gameEndTimestamp":1690000000000,"participants":[]}}"#;
        assert_eq!(duration_of(json).unwrap().as_secs(), 1800);
    }

    #[test]
    fn test_missing_duration_is_malformed() {
        assert!(matches!(duration_of(r#"{"info":{}}"#), Err(HttpError::InvalidJson(_))));
        assert!(matches!(duration_of(r#"{"status":{"message":"oops"}}"#), Err(HttpError::InvalidJson(_))));
    }

    #[test]
    fn test_negative_duration_is_malformed() {
        assert!(matches!(duration_of(r#"{"info":{"gameDuration":-5,"gameEndTimestamp":1}}"#), Err(HttpError::MalformedResponse(_))));
    }

    #[test]
    fn test_out_of_range_duration_is_malformed() {
        assert!(matches!(duration_of(r#"{"info":{"gameDuration":1e20,"gameEndTimestamp":1}}"#), Err(HttpError::MalformedResponse(_))));
        assert_eq!(duration_of(r#"{"info":{"gameDuration":1e19,"gameEndTimestamp":1}}"#).unwrap().as_secs(), 10_000_000_000_000_000_000);
    }

    #[test]
    fn test_summoner_and_match_ids_deserialize() {
        let summoner: Summoner = serde_json::from_str(r#"{"id":"x","name":"Faker","puuid":"abc-123","summonerLevel":500}"#).unwrap();
        assert_eq!(summoner, Summoner { name: "Faker".to_string(), puuid: "abc-123".to_string() });

        let ids: Vec<MatchId> = serde_json::from_str(r#"["KR_2","KR_1"]"#).unwrap();
        assert_eq!(ids, vec![MatchId::new("KR_2"), MatchId::new("KR_1")]);
        assert_eq!(ids[0].to_string(), "KR_2");
    }
}
