use std::{path::PathBuf, pin::Pin};

use async_stream::try_stream;
use energy_store::{Reading, ReadingStore};
use futures::{Stream, StreamExt};
use time::OffsetDateTime;
use tokio::{
    fs::File,
    io::{AsyncBufReadExt, BufReader},
};

use crate::{error::ApiError, transform::validate_reading};

#[derive(thiserror::Error, Debug)]
pub enum SourceError {
    #[error("failed to open seed file {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to read seed file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// One non-blank line of a seed file after validation.
#[derive(Debug)]
pub struct SeedLine {
    pub line_no: usize,
    pub outcome: Result<Reading, ApiError>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub stored: usize,
    pub rejected: usize,
}

/// NDJSON seed source for readings.
///
/// Each line is a JSON object with the same shape as the `POST /api/energy`
/// body and goes through the same validation. Blank lines are skipped.
pub struct SeedFileSource {
    path: PathBuf,
}

impl SeedFileSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn stream(&self) -> Pin<Box<dyn Stream<Item = Result<SeedLine, SourceError>> + Send>> {
        let path = self.path.clone();
        let s = try_stream! {
            let file = File::open(&path).await.map_err(|source| SourceError::Open {
                path: path.clone(),
                source,
            })?;
            let mut lines = BufReader::new(file).lines();
            let mut line_no = 0usize;

            while let Some(line) = lines.next_line().await.map_err(|source| SourceError::Read {
                path: path.clone(),
                source,
            })? {
                line_no += 1;
                if line.trim().is_empty() {
                    continue;
                }

                let outcome = serde_json::from_str(&line)
                    .map_err(|e| ApiError::Parse(format!("invalid JSON: {e}")))
                    .and_then(|value| validate_reading(value, OffsetDateTime::now_utc()));

                yield SeedLine { line_no, outcome };
            }
        };

        Box::pin(s)
    }

    /// Append every valid line to `store`; invalid lines are logged and skipped.
    pub async fn load_into(&self, store: &ReadingStore) -> Result<SeedReport, SourceError> {
        let mut report = SeedReport::default();
        let mut stream = self.stream();

        while let Some(line) = stream.next().await {
            let line = line?;
            match line.outcome {
                Ok(reading) => {
                    store.append(reading).await;
                    report.stored += 1;
                }
                Err(e) => {
                    metrics::counter!("energy_seed_lines_rejected_total").increment(1);
                    tracing::warn!(
                        path = %self.path.display(),
                        line = line.line_no,
                        error = %e,
                        "skipping invalid seed line"
                    );
                    report.rejected += 1;
                }
            }
        }

        Ok(report)
    }
}
