// Product API - Axum routes for search and report
// Catalog reads are synchronous, so handlers run them on the blocking pool

use crate::catalog::CatalogSource;
use crate::config::ServerConfig;
use crate::db::ProductItem;
use crate::error::{ApiError, ApiResult};
use crate::report::{ReportAggregator, SearchReport};
use crate::search::ProductSearchService;
use anyhow::anyhow;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogSource>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(catalog: Arc<dyn CatalogSource>, config: ServerConfig) -> Self {
        Self {
            catalog,
            config: Arc::new(config),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "OK",
        version: crate::VERSION,
    })
}

/// GET /api/products/search?query=... - Products whose name or description match
async fn search_products(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> ApiResult<Json<Vec<ProductItem>>> {
    let Query(params) = params.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let query = params.query.ok_or(ApiError::MissingParameter("query"))?;

    let catalog = state.catalog.clone();
    let results = tokio::task::spawn_blocking(move || ProductSearchService::new(catalog).search(&query))
        .await
        .map_err(|e| anyhow!("search task failed: {e}"))??;

    Ok(Json(results))
}

/// GET /api/products/report - Product count and key term hits
async fn product_report(State(state): State<AppState>) -> ApiResult<Json<SearchReport>> {
    let catalog = state.catalog.clone();
    let report = tokio::task::spawn_blocking(move || ReportAggregator::new(catalog).generate())
        .await
        .map_err(|e| anyhow!("report task failed: {e}"))??;

    Ok(Json(report))
}

// ============================================================================
// Router
// ============================================================================

pub fn build_router(state: AppState) -> Router {
    let enable_cors = state.config.enable_cors;

    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/products/search", get(search_products))
        .route("/products/report", get(product_report))
        .with_state(state);

    let app = Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http());

    if enable_cors {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}
