use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, extract::Request, routing::get, Router};
use energy_store::ReadingStore;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::Level;

use super::{
    handlers::{energy, health},
    AppState,
};

pub fn create_router(store: Arc<ReadingStore>, max_body_bytes: usize) -> Router {
    let state = AppState { store };

    let api_routes = Router::new()
        .route(
            "/api/energy",
            get(energy::query_readings).post(energy::ingest_reading),
        )
        .route("/api/energy/summary", get(energy::get_summary))
        .route("/api/energy/sources", get(energy::list_sources));

    Router::new()
        .route("/health", get(health::health))
        .merge(api_routes)
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request| {
                    tracing::span!(
                        Level::INFO,
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                    )
                })
                .on_response(
                    |response: &axum::response::Response,
                     latency: std::time::Duration,
                     _span: &tracing::Span| {
                        tracing::event!(
                            Level::INFO,
                            status = response.status().as_u16(),
                            latency = ?latency,
                            "request completed"
                        );
                    },
                ),
        )
}
