use energy_store::{Reading, SourceInfo, SourceSummary};
use serde::{Deserialize, Serialize};

/// Query string accepted by the read endpoints. Empty values count as absent.
#[derive(Debug, Default, Deserialize)]
pub struct EnergyQuery {
    pub source_id: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

impl EnergyQuery {
    pub fn source_id(&self) -> Option<&str> {
        non_blank(&self.source_id)
    }

    pub fn from_bound(&self) -> Option<&str> {
        non_blank(&self.from)
    }

    pub fn to_bound(&self) -> Option<&str> {
        non_blank(&self.to)
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub status: &'static str,
    pub received: Reading,
}

#[derive(Debug, Serialize)]
pub struct ReadingsResponse {
    pub readings: Vec<Reading>,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub summaries: Vec<SourceSummary>,
}

#[derive(Debug, Serialize)]
pub struct SourcesResponse {
    pub sources: Vec<SourceInfo>,
}
