use serde::Serialize;
use time::{OffsetDateTime, UtcOffset};

/// Years an RFC 3339 timestamp can carry.
const MIN_YEAR: i32 = 0;
const MAX_YEAR: i32 = 9999;

/// One energy measurement reported by a source (meter or device).
///
/// The timestamp is held in UTC so that two readings compare and serialize
/// the same way regardless of the offset they arrived with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading {
    pub source_id: String,
    pub usage: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

impl Reading {
    /// Build a reading. Pass a timestamp from [`canonical_timestamp`]; any
    /// other value is converted to UTC when that instant is representable.
    pub fn new(source_id: impl Into<String>, usage: f64, timestamp: OffsetDateTime) -> Self {
        Self {
            source_id: source_id.into(),
            usage,
            timestamp: timestamp
                .checked_to_offset(UtcOffset::UTC)
                .unwrap_or(timestamp),
        }
    }
}

/// `ts` in UTC, or `None` when the UTC instant has no RFC 3339 form
/// (year outside 0000..=9999).
pub fn canonical_timestamp(ts: OffsetDateTime) -> Option<OffsetDateTime> {
    ts.checked_to_offset(UtcOffset::UTC)
        .filter(|utc| (MIN_YEAR..=MAX_YEAR).contains(&utc.year()))
}
