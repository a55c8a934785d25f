// Product Search - Web Server
// REST API with Axum

use anyhow::{Context, Result};
use product_search::{build_router, init_tracing, load_csv, AppState, ServerConfig, SqliteCatalog};
use std::sync::Arc;

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::load()?;
    init_tracing(&config.log_level);

    // Open catalog
    let catalog = SqliteCatalog::open(&config.database_path)?;
    tracing::info!(path = %config.database_path.display(), "catalog opened");

    if let Some(seed) = &config.seed_csv {
        let products = load_csv(seed)?;
        let inserted = catalog.import(&products)?;
        tracing::info!(path = %seed.display(), inserted, "seeded catalog");
    }

    let addr = config.socket_addr()?;
    let state = AppState::new(Arc::new(catalog), config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!("server running on http://{}", addr);
    tracing::info!("  search: http://{}/api/products/search?query=cool", addr);
    tracing::info!("  report: http://{}/api/products/report", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
