use std::sync::Arc;

use anyhow::{Context, Result};
use energy_service::{
    api, config::AppConfig, metrics_server, observability, sources::SeedFileSource,
};
use energy_store::ReadingStore;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    let cfg = AppConfig::load()?;
    info!("Configuration loaded");

    if let Some(metrics_cfg) = &cfg.metrics {
        metrics_server::init(&metrics_cfg.bind_addr).await?;
    }

    let store = Arc::new(ReadingStore::new());

    if let Some(seed) = &cfg.seed {
        let report = SeedFileSource::new(&seed.path).load_into(&store).await?;
        info!(
            path = %seed.path.display(),
            stored = report.stored,
            rejected = report.rejected,
            "seed file loaded"
        );
    }

    let app = api::create_router(store.clone(), cfg.server.max_body_bytes);
    let listener = tokio::net::TcpListener::bind(&cfg.server.bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", cfg.server.bind_addr))?;

    info!(addr = %cfg.server.bind_addr, "energy API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("API server error")?;

    info!(readings = store.len().await, "shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
