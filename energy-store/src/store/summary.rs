use serde::Serialize;
use time::OffsetDateTime;

use crate::domain::Reading;

/// Aggregated usage for one source over a time range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceSummary {
    pub source_id: String,
    pub count: usize,
    pub total_usage: f64,
    pub min_usage: f64,
    pub max_usage: f64,
    pub average_usage: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub first_timestamp: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub last_timestamp: OffsetDateTime,
}

impl SourceSummary {
    /// Summarize a timestamp-ordered slice. Returns `None` for an empty slice.
    pub(crate) fn from_readings(source_id: &str, readings: &[Reading]) -> Option<Self> {
        let first = readings.first()?;
        let last = readings.last()?;

        let mut total_usage = 0.0;
        let mut min_usage = f64::INFINITY;
        let mut max_usage = f64::NEG_INFINITY;
        for r in readings {
            total_usage += r.usage;
            min_usage = min_usage.min(r.usage);
            max_usage = max_usage.max(r.usage);
        }

        Some(Self {
            source_id: source_id.to_string(),
            count: readings.len(),
            total_usage,
            min_usage,
            max_usage,
            average_usage: total_usage / readings.len() as f64,
            first_timestamp: first.timestamp,
            last_timestamp: last.timestamp,
        })
    }
}

/// What the store knows about a single source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceInfo {
    pub source_id: String,
    pub reading_count: usize,
    #[serde(with = "time::serde::rfc3339::option")]
    pub latest_timestamp: Option<OffsetDateTime>,
}
