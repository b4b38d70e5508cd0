//! Shared reading store.
//!
//! Locking is two-level: an index lock guarding the map of sources, and one
//! lock per source guarding its series. The index is only write-locked the
//! first time a source is seen, so appends to different sources proceed
//! independently.

mod series;
mod summary;

use std::{collections::BTreeMap, sync::Arc};

use time::OffsetDateTime;
use tokio::sync::RwLock;

use crate::domain::Reading;
use series::Series;

pub use summary::{SourceInfo, SourceSummary};

type SharedSeries = Arc<RwLock<Series>>;

#[derive(Debug, Default)]
pub struct ReadingStore {
    sources: RwLock<BTreeMap<String, SharedSeries>>,
}

impl ReadingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a reading under its `source_id` and return the stored copy.
    pub async fn append(&self, reading: Reading) -> Reading {
        let series = self.series_or_insert(&reading.source_id).await;
        series.write().await.push(reading.clone());
        reading
    }

    /// Reading with the greatest timestamp for `source_id`; the last arrival
    /// wins among equal timestamps.
    pub async fn latest(&self, source_id: &str) -> Option<Reading> {
        let series = self.series(source_id).await?;
        let guard = series.read().await;
        guard.latest().cloned()
    }

    /// Readings for `source_id` within the inclusive range, oldest first.
    pub async fn range(
        &self,
        source_id: &str,
        from: Option<OffsetDateTime>,
        to: Option<OffsetDateTime>,
    ) -> Vec<Reading> {
        let Some(series) = self.series(source_id).await else {
            return Vec::new();
        };
        let guard = series.read().await;
        guard.range(from, to).to_vec()
    }

    /// Latest reading of every source, ordered by `source_id`.
    pub async fn latest_all(&self) -> Vec<Reading> {
        let mut out = Vec::new();
        for (_, series) in self.snapshot().await {
            if let Some(r) = series.read().await.latest() {
                out.push(r.clone());
            }
        }
        out
    }

    /// Readings of every source within the inclusive range, ordered by
    /// timestamp. Ties keep `source_id` order, then arrival order.
    pub async fn range_all(
        &self,
        from: Option<OffsetDateTime>,
        to: Option<OffsetDateTime>,
    ) -> Vec<Reading> {
        let mut out = Vec::new();
        for (_, series) in self.snapshot().await {
            out.extend_from_slice(series.read().await.range(from, to));
        }
        // Stable sort: per-source order and source order survive ties.
        out.sort_by_key(|r| r.timestamp);
        out
    }

    /// Per-source aggregates over the inclusive range. Sources with no
    /// readings in range are left out.
    pub async fn summary(
        &self,
        source_id: Option<&str>,
        from: Option<OffsetDateTime>,
        to: Option<OffsetDateTime>,
    ) -> Vec<SourceSummary> {
        let targets = match source_id {
            Some(id) => match self.series(id).await {
                Some(series) => vec![(id.to_string(), series)],
                None => Vec::new(),
            },
            None => self.snapshot().await,
        };

        let mut out = Vec::with_capacity(targets.len());
        for (id, series) in targets {
            let guard = series.read().await;
            if let Some(s) = SourceSummary::from_readings(&id, guard.range(from, to)) {
                out.push(s);
            }
        }
        out
    }

    /// Every known source with its reading count, ordered by `source_id`.
    pub async fn sources(&self) -> Vec<SourceInfo> {
        let mut out = Vec::new();
        for (source_id, series) in self.snapshot().await {
            let guard = series.read().await;
            out.push(SourceInfo {
                source_id,
                reading_count: guard.len(),
                latest_timestamp: guard.latest().map(|r| r.timestamp),
            });
        }
        out
    }

    /// Total number of stored readings across all sources.
    pub async fn len(&self) -> usize {
        let mut total = 0;
        for (_, series) in self.snapshot().await {
            total += series.read().await.len();
        }
        total
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn series(&self, source_id: &str) -> Option<SharedSeries> {
        self.sources.read().await.get(source_id).cloned()
    }

    async fn series_or_insert(&self, source_id: &str) -> SharedSeries {
        if let Some(series) = self.series(source_id).await {
            return series;
        }

        let mut sources = self.sources.write().await;
        sources.entry(source_id.to_string()).or_default().clone()
    }

    /// Clone the source index so per-source locks are taken without holding
    /// the index lock.
    async fn snapshot(&self) -> Vec<(String, SharedSeries)> {
        self.sources
            .read()
            .await
            .iter()
            .map(|(id, series)| (id.clone(), series.clone()))
            .collect()
    }
}
