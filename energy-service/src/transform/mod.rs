use energy_store::{canonical_timestamp, Reading};
use serde::Deserialize;
use serde_json::Value;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

use crate::error::ApiError;

/// Largest accepted `usage`. Keeps per-source totals finite.
pub const MAX_USAGE: f64 = 1e15;

/// Wire shape of a reading as submitted by a client or a seed file.
///
/// `timestamp` is kept as raw JSON so that a bad timestamp can be told apart
/// from a bad `source_id` or `usage`.
#[derive(Debug, Deserialize)]
struct IncomingReading {
    #[serde(default)]
    source_id: Option<String>,
    #[serde(default)]
    usage: Option<f64>,
    #[serde(default)]
    timestamp: Option<Value>,
}

/// Validate a decoded JSON document and turn it into a canonical `Reading`.
///
/// Rules:
/// - body must be a JSON object.
/// - source_id must be a non-blank string (surrounding whitespace is dropped).
/// - usage must be a number in `0..=MAX_USAGE`.
/// - timestamp, when present and not null, must be an RFC 3339 string whose
///   UTC instant falls in years 0000..=9999; otherwise `now` is used.
pub fn validate_reading(value: Value, now: OffsetDateTime) -> Result<Reading, ApiError> {
    if !value.is_object() {
        return Err(ApiError::Validation(
            "request body must be a JSON object".to_string(),
        ));
    }

    let incoming = IncomingReading::deserialize(value)
        .map_err(|e| ApiError::Validation(format!("invalid reading: {e}")))?;

    let source_id = incoming
        .source_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::Validation("source_id is required".to_string()))?;

    let usage = incoming
        .usage
        .ok_or_else(|| ApiError::Validation("usage is required".to_string()))?;
    if !usage.is_finite() || usage < 0.0 {
        return Err(ApiError::Validation(
            "usage must be a non-negative number".to_string(),
        ));
    }
    if usage > MAX_USAGE {
        return Err(ApiError::Validation(format!(
            "usage must not exceed {MAX_USAGE:e}"
        )));
    }

    let timestamp = match incoming.timestamp {
        None | Some(Value::Null) => now,
        Some(Value::String(s)) => parse_timestamp("timestamp", &s)?,
        Some(other) => {
            return Err(ApiError::Parse(format!(
                "timestamp must be an RFC 3339 string, got {other}"
            )));
        }
    };

    Ok(Reading::new(source_id, usage, timestamp))
}

/// Parse an RFC 3339 instant into UTC, naming `field` in the error.
///
/// Instants whose UTC form leaves years 0000..=9999 are rejected: they
/// cannot be written back out as RFC 3339.
pub fn parse_timestamp(field: &str, raw: &str) -> Result<OffsetDateTime, ApiError> {
    let ts = OffsetDateTime::parse(raw.trim(), &Rfc3339)
        .map_err(|e| ApiError::Parse(format!("invalid {field} '{raw}': {e}")))?;

    canonical_timestamp(ts).ok_or_else(|| {
        ApiError::Parse(format!(
            "invalid {field} '{raw}': UTC year must be between 0000 and 9999"
        ))
    })
}
