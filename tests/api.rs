//! Integration tests for the product API endpoints
//!
//! Requests are driven straight through the router with `oneshot`, no socket.

#![cfg(feature = "server")]

use std::sync::Arc;

use anyhow::anyhow;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use product_search::{
    build_router, AppState, CatalogSource, InMemoryCatalog, ProductItem, ServerConfig,
    SqliteCatalog,
};
use serde_json::Value;
use tower::ServiceExt;

/// Catalog whose backing store is unreachable
struct BrokenCatalog;

impl CatalogSource for BrokenCatalog {
    fn list_all(&self) -> anyhow::Result<Vec<ProductItem>> {
        Err(anyhow!("connection refused"))
    }

    fn count(&self) -> anyhow::Result<i64> {
        Err(anyhow!("connection refused"))
    }
}

fn create_test_catalog() -> Arc<dyn CatalogSource> {
    Arc::new(InMemoryCatalog::new(vec![
        ProductItem::new(1, "Cool Toy", "fun"),
        ProductItem::new(2, "Boring Toy", "Cool for kids"),
        ProductItem::new(3, "Perfect Pillow", "soft").with_price(19.5),
    ]))
}

async fn get(catalog: Arc<dyn CatalogSource>, uri: &str) -> (StatusCode, Value) {
    let app = build_router(AppState::new(catalog, ServerConfig::default()));

    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, body)
}

fn names(body: &Value) -> Vec<String> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|item| item["name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_health() {
    let (status, body) = get(create_test_catalog(), "/api/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
}

#[tokio::test]
async fn test_search_substring() {
    let (status, body) = get(create_test_catalog(), "/api/products/search?query=cool").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body), vec!["Cool Toy", "Boring Toy"]);
}

#[tokio::test]
async fn test_search_exact_quoted() {
    let (status, body) = get(
        create_test_catalog(),
        "/api/products/search?query=%22Cool%20Toy%22",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body), vec!["Cool Toy"]);
}

#[tokio::test]
async fn test_search_item_shape() {
    let (_, body) = get(create_test_catalog(), "/api/products/search?query=pillow").await;

    let item = &body[0];
    assert_eq!(item["id"], 3);
    assert_eq!(item["description"], "soft");
    assert_eq!(item["price"], 19.5);
}

#[tokio::test]
async fn test_search_empty_query_returns_all() {
    let (status, body) = get(create_test_catalog(), "/api/products/search?query=").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_search_missing_query_is_bad_request() {
    let (status, body) = get(create_test_catalog(), "/api/products/search").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "MISSING_PARAMETER");
}

#[tokio::test]
async fn test_search_malformed_query_is_bad_request() {
    let (status, body) = get(create_test_catalog(), "/api/products/search?query=a&query=b").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_search_lone_quote_is_substring() {
    let (status, body) = get(create_test_catalog(), "/api/products/search?query=%22").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_search_catalog_failure_is_server_error() {
    let (status, body) = get(Arc::new(BrokenCatalog), "/api/products/search?query=cool").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "CATALOG_ERROR");
}

#[tokio::test]
async fn test_report() {
    let (status, body) = get(create_test_catalog(), "/api/products/report").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["productCount"], 3);
    assert_eq!(body["searchTermHits"]["Cool"], 2);
    assert_eq!(body["searchTermHits"]["Amazing"], 0);
    assert_eq!(body["searchTermHits"]["Perfect"], 1);
    assert_eq!(body["searchTermHits"]["Kids"], 1);
}

#[tokio::test]
async fn test_report_catalog_failure_is_server_error() {
    let (status, _) = get(Arc::new(BrokenCatalog), "/api/products/report").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_report_over_sqlite() {
    let catalog = SqliteCatalog::in_memory().unwrap();
    catalog
        .import(&[
            ProductItem::new(1, "Kids Bike", ""),
            ProductItem::new(2, "Amazing Lamp", "for kids"),
        ])
        .unwrap();

    let (status, body) = get(Arc::new(catalog), "/api/products/report").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["productCount"], 2);
    assert_eq!(body["searchTermHits"]["Kids"], 2);
    assert_eq!(body["searchTermHits"]["Amazing"], 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_requests_over_sqlite() {
    let catalog = SqliteCatalog::in_memory().unwrap();
    catalog
        .import(&[
            ProductItem::new(1, "Cool Toy", "fun"),
            ProductItem::new(2, "Kids Bike", "Cool for kids"),
        ])
        .unwrap();
    let catalog: Arc<dyn CatalogSource> = Arc::new(catalog);

    let mut handles = Vec::new();
    for i in 0..16 {
        let catalog = catalog.clone();
        let uri = if i % 2 == 0 {
            "/api/products/search?query=cool"
        } else {
            "/api/products/report"
        };
        handles.push(tokio::spawn(async move { get(catalog, uri).await }));
    }

    for (i, handle) in handles.into_iter().enumerate() {
        let (status, body) = handle.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        if i % 2 == 0 {
            assert_eq!(names(&body), vec!["Cool Toy", "Kids Bike"]);
        } else {
            assert_eq!(body["productCount"], 2);
            assert_eq!(body["searchTermHits"]["Cool"], 2);
        }
    }
}
