use anyhow::Context;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use time::OffsetDateTime;

use crate::{
    api::{
        models::energy::{
            EnergyQuery, IngestResponse, ReadingsResponse, SourcesResponse, SummaryResponse,
        },
        AppState,
    },
    error::ApiError,
    transform::{parse_timestamp, validate_reading},
};

type TimeRange = (Option<OffsetDateTime>, Option<OffsetDateTime>);

/// `POST /api/energy`: validate one reading and append it to the store.
pub async fn ingest_reading(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ApiError> {
    metrics::counter!("energy_ingest_requests_total").increment(1);

    let reading = body
        .map_err(|e| ApiError::Parse(e.body_text()))
        .and_then(|Json(value)| validate_reading(value, OffsetDateTime::now_utc()))
        .inspect_err(|e| {
            metrics::counter!("energy_ingest_rejected_total").increment(1);
            tracing::debug!(error = %e, "rejected reading");
        })?;

    // Rendered before the append: a failed reply must leave the store untouched.
    let response = json_response(
        StatusCode::CREATED,
        &IngestResponse {
            status: "success",
            received: reading.clone(),
        },
    )?;

    let stored = state.store.append(reading).await;
    metrics::counter!("energy_readings_stored_total").increment(1);
    tracing::debug!(
        source_id = %stored.source_id,
        usage = stored.usage,
        timestamp = %stored.timestamp,
        "reading stored"
    );

    Ok(response)
}

/// `GET /api/energy`: latest reading per source without a range, every
/// reading in `[from, to]` with one.
pub async fn query_readings(
    State(state): State<AppState>,
    query: Result<Query<EnergyQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    metrics::counter!("energy_query_requests_total").increment(1);

    let Query(query) = query.map_err(|e| ApiError::Parse(e.body_text()))?;
    let (from, to) = parse_range(&query)?;
    let ranged = from.is_some() || to.is_some();

    let readings = match (query.source_id(), ranged) {
        (Some(id), false) => state.store.latest(id).await.into_iter().collect(),
        (Some(id), true) => state.store.range(id, from, to).await,
        (None, false) => state.store.latest_all().await,
        (None, true) => state.store.range_all(from, to).await,
    };

    json_response(StatusCode::OK, &ReadingsResponse { readings })
}

/// `GET /api/energy/summary`: per-source usage aggregates over an optional range.
pub async fn get_summary(
    State(state): State<AppState>,
    query: Result<Query<EnergyQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::Parse(e.body_text()))?;
    let (from, to) = parse_range(&query)?;

    let summaries = state.store.summary(query.source_id(), from, to).await;
    json_response(StatusCode::OK, &SummaryResponse { summaries })
}

/// `GET /api/energy/sources`
pub async fn list_sources(State(state): State<AppState>) -> Result<Response, ApiError> {
    let sources = state.store.sources().await;
    json_response(StatusCode::OK, &SourcesResponse { sources })
}

/// Serialize `body` as the JSON reply. A serializer failure becomes an
/// internal error so its message never reaches the client.
fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Result<Response, ApiError> {
    let bytes = serde_json::to_vec(body).context("failed to serialize response body")?;
    Ok((
        status,
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        )],
        bytes,
    )
        .into_response())
}

fn parse_range(query: &EnergyQuery) -> Result<TimeRange, ApiError> {
    let from = query
        .from_bound()
        .map(|raw| parse_bound("from", raw))
        .transpose()?;
    let to = query
        .to_bound()
        .map(|raw| parse_bound("to", raw))
        .transpose()?;

    if let (Some(from), Some(to)) = (from, to) {
        if from > to {
            return Err(ApiError::Validation(
                "from must not be later than to".to_string(),
            ));
        }
    }

    Ok((from, to))
}

/// A `+` offset sent unencoded arrives as a space; say so in the error.
fn parse_bound(field: &str, raw: &str) -> Result<OffsetDateTime, ApiError> {
    parse_timestamp(field, raw).map_err(|e| match e {
        ApiError::Parse(msg) if raw.contains(' ') => ApiError::Parse(format!(
            "{msg} (percent-encode a '+' offset as %2B in the query string)"
        )),
        other => other,
    })
}
