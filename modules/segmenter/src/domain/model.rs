use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde::{Deserialize, Serialize, Serializer};

/// A parsed inbound request: the payload bytes and the timestamp shared by
/// every segment cut from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub payload: Vec<u8>,
    pub timestamp: DateTime<FixedOffset>,
}

impl InboundMessage {
    #[must_use]
    pub fn new(payload: impl Into<Vec<u8>>, timestamp: DateTime<FixedOffset>) -> Self {
        Self {
            payload: payload.into(),
            timestamp,
        }
    }
}

/// How a chunk's bytes are carried in the segment's `data` field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentEncoding {
    /// The chunk as a UTF-8 string; chunks must not split a character.
    #[default]
    Text,
    /// Standard base64 with padding; accepts any bytes.
    Base64,
}

/// Outbound envelope for one chunk.
///
/// Serializes as `{"data":..,"time":..,"number":..,"count":..}` in that order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub data: String,
    #[serde(serialize_with = "serialize_time")]
    pub time: DateTime<FixedOffset>,
    /// Zero-based position of this segment.
    #[serde(rename = "number")]
    pub ordinal: usize,
    /// Total number of segments cut from the same message.
    pub count: usize,
}

/// RFC 3339 with the shortest exact fraction, `Z` for UTC.
#[allow(clippy::trivially_copy_pass_by_ref)] // serde passes fields by reference
fn serialize_time<S>(time: &DateTime<FixedOffset>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_time(*time))
}

/// Format with nanosecond precision, then drop trailing zeros of the
/// fraction (and the `.` when nothing is left).
pub(crate) fn format_time(time: DateTime<FixedOffset>) -> String {
    let full = time.to_rfc3339_opts(SecondsFormat::Nanos, true);
    // Nanos always writes `.` plus nine digits right after the seconds
    let Some(dot) = full.find('.') else {
        return full;
    };
    let frac_end = dot + 10;
    let Some(fraction) = full.get(dot + 1..frac_end) else {
        return full;
    };
    let fraction = fraction.trim_end_matches('0');

    let mut out = String::with_capacity(full.len());
    out.push_str(&full[..dot]);
    if !fraction.is_empty() {
        out.push('.');
        out.push_str(fraction);
    }
    out.push_str(&full[frac_end..]);
    out
}
