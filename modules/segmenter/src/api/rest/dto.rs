use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::InboundMessage;

/// Inbound body for the split endpoint
///
/// `time` accepts an RFC 3339 string or integer milliseconds since the epoch.
/// Unknown fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct SplitRequest {
    pub text: String,
    #[serde(deserialize_with = "deserialize_time")]
    pub time: DateTime<FixedOffset>,
}

impl From<SplitRequest> for InboundMessage {
    fn from(req: SplitRequest) -> Self {
        InboundMessage::new(req.text, req.time)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TimeRepr {
    Rfc3339(String),
    EpochMillis(i64),
}

fn deserialize_time<'de, D>(deserializer: D) -> Result<DateTime<FixedOffset>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as _;

    match TimeRepr::deserialize(deserializer)? {
        TimeRepr::Rfc3339(s) => DateTime::parse_from_rfc3339(&s).map_err(D::Error::custom),
        TimeRepr::EpochMillis(ms) => DateTime::<Utc>::from_timestamp_millis(ms)
            .map(|t| t.fixed_offset())
            .ok_or_else(|| D::Error::custom(format!("timestamp {ms}ms is out of range"))),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthDto {
    pub status: &'static str,
}
