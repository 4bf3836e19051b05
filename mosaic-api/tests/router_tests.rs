//! HTTP Router Tests
//!
//! Drives the full router, gate included, with `tower::ServiceExt::oneshot`
//! against fake upstream systems.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{HeaderValue, Request, StatusCode},
    Router,
};
use mosaic_api::{
    create_api_router, ApiError, AppState, ErrorCode, IdempotencyGate, ProductOrchestrator,
    IDEMPOTENCY_KEY_HEADER,
};
use mosaic_storage::InMemoryCatalogCache;
use mosaic_test_utils::{catalog_record, CatalogCall, FakeCatalog, FakeStock, Product};
use serde::de::DeserializeOwned;
use serde_json::json;
use tower::ServiceExt;

// ============================================================================
// TEST HELPERS
// ============================================================================

const BODY_LIMIT: usize = 1024 * 1024;

struct TestApp {
    router: Router,
    catalog: Arc<FakeCatalog>,
}

fn test_app(catalog: FakeCatalog, stock: FakeStock) -> TestApp {
    let catalog = Arc::new(catalog);
    let orchestrator = ProductOrchestrator::new(
        catalog.clone(),
        Arc::new(stock),
        Arc::new(InMemoryCatalogCache::new()),
        Duration::from_secs(300),
    );
    let state = AppState::new(orchestrator, IdempotencyGate::new());
    TestApp {
        router: create_api_router(state),
        catalog,
    }
}

impl TestApp {
    async fn send(&self, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let body = to_bytes(response.into_body(), BODY_LIMIT)
            .await
            .expect("body is readable");
        (status, body.to_vec())
    }
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).expect("valid request")
}

fn write(method: &str, uri: &str, token: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header(IDEMPOTENCY_KEY_HEADER, token);
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("valid request")
}

fn parse<T: DeserializeOwned>(body: &[u8]) -> T {
    serde_json::from_slice(body).expect("body is valid JSON")
}

fn widget() -> serde_json::Value {
    json!({"id": "7", "name": "Widget", "description": "Blue", "stock": 0})
}

// ============================================================================
// READ PATH
// ============================================================================

#[tokio::test]
async fn test_list_products() {
    let app = test_app(
        FakeCatalog::with_records(vec![
            catalog_record("1", "P1", "D1"),
            json!({"Name": "orphan"}),
        ]),
        FakeStock::with_levels([("1", 7)]),
    );

    let (status, body) = app.send(get("/api/v1/products")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        parse::<serde_json::Value>(&body),
        json!([{"id": "1", "name": "P1", "description": "D1", "stock": 7}])
    );
}

#[tokio::test]
async fn test_get_product_not_found() {
    let app = test_app(FakeCatalog::new(), FakeStock::new());

    let (status, body) = app.send(get("/api/v1/products/missing-id")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(parse::<ApiError>(&body).code, ErrorCode::EntityNotFound);
}

#[tokio::test]
async fn test_get_product_found() {
    let app = test_app(
        FakeCatalog::with_records(vec![json!({"ID": "3", "NAME": "Gadget"})]),
        FakeStock::new(),
    );

    let (status, body) = app.send(get("/api/v1/products/3")).await;
    assert_eq!(status, StatusCode::OK);
    let product: Product = parse(&body);
    assert_eq!(product.id, "3");
    assert_eq!(product.name, "Gadget");
    assert_eq!(product.stock, 0);
}

#[tokio::test]
async fn test_catalog_outage_is_bad_gateway() {
    let app = test_app(FakeCatalog::new(), FakeStock::new());
    app.catalog.set_unreachable(true);

    let (status, body) = app.send(get("/api/v1/products")).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    let error: ApiError = parse(&body);
    assert_eq!(error.code, ErrorCode::UpstreamUnavailable);
    assert_eq!(error.details, Some(json!({"system": "catalog"})));
}

// ============================================================================
// WRITE PATH
// ============================================================================

#[tokio::test]
async fn test_create_returns_created_product() {
    let app = test_app(FakeCatalog::new(), FakeStock::new());

    let (status, body) = app
        .send(write("POST", "/api/v1/products", Some("k-1"), widget()))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(parse::<serde_json::Value>(&body), widget());
    assert_eq!(app.catalog.create_calls(), 1);
}

#[tokio::test]
async fn test_reused_token_is_rejected_at_gate() {
    let app = test_app(FakeCatalog::new(), FakeStock::new());

    let (first, _) = app
        .send(write("POST", "/api/v1/products", Some("k-1"), widget()))
        .await;
    let (second, body) = app
        .send(write("PUT", "/api/v1/products/7", Some("k-1"), widget()))
        .await;

    assert_eq!(first, StatusCode::CREATED);
    assert_eq!(second, StatusCode::CONFLICT);
    let error: ApiError = parse(&body);
    assert_eq!(error.code, ErrorCode::DuplicateRequest);
    assert!(error.message.contains("Duplicate"));
    assert_eq!(app.catalog.write_calls(), 1);
}

#[tokio::test]
async fn test_opaque_token_is_claimed_then_conflicts() {
    let app = test_app(FakeCatalog::new(), FakeStock::new());
    let request = || {
        let mut request = write("POST", "/api/v1/products", None, widget());
        let token = HeaderValue::from_bytes(b"caf\xe9").expect("opaque bytes are a valid header");
        request.headers_mut().insert(IDEMPOTENCY_KEY_HEADER, token);
        request
    };

    let (first, _) = app.send(request()).await;
    assert_eq!(first, StatusCode::CREATED);
    assert_eq!(app.catalog.create_calls(), 1);

    let (second, body) = app.send(request()).await;
    assert_eq!(second, StatusCode::CONFLICT);
    assert_eq!(parse::<ApiError>(&body).code, ErrorCode::DuplicateRequest);
    assert_eq!(app.catalog.create_calls(), 1);
}

#[tokio::test]
async fn test_token_whitespace_is_significant_at_gate() {
    let app = test_app(FakeCatalog::new(), FakeStock::new());

    let (first, _) = app
        .send(write("PUT", "/api/v1/products/7", Some("k-2"), widget()))
        .await;
    let (second, _) = app
        .send(write("PUT", "/api/v1/products/7", Some(" k-2"), widget()))
        .await;

    assert_eq!(first, StatusCode::NO_CONTENT);
    assert_eq!(second, StatusCode::NO_CONTENT);
    assert_eq!(app.catalog.update_calls(), 2);
}

#[tokio::test]
async fn test_update_ids_differing_by_trailing_slash_are_distinct() {
    let app = test_app(FakeCatalog::new(), FakeStock::new());

    let (first, _) = app
        .send(write("PUT", "/api/v1/products/x%2F", None, widget()))
        .await;
    let (second, _) = app
        .send(write("PUT", "/api/v1/products/x", None, widget()))
        .await;

    assert_eq!(first, StatusCode::NO_CONTENT);
    assert_eq!(second, StatusCode::NO_CONTENT);
    assert_eq!(app.catalog.update_calls(), 2);
}

#[tokio::test]
async fn test_tokenless_writes_pass_gate_and_dedupe_in_ledger() {
    let app = test_app(FakeCatalog::new(), FakeStock::new());

    let (first, _) = app.send(write("PUT", "/api/v1/products/7", None, widget())).await;
    let (second, _) = app.send(write("PUT", "/api/v1/products/7", None, widget())).await;

    assert_eq!(first, StatusCode::NO_CONTENT);
    assert_eq!(second, StatusCode::NO_CONTENT);
    assert_eq!(app.catalog.update_calls(), 1);
}

#[tokio::test]
async fn test_rejected_upstream_write_still_succeeds() {
    let app = test_app(FakeCatalog::new().with_write_status(422), FakeStock::new());

    let (status, _) = app
        .send(write("PUT", "/api/v1/products/7", Some("k-9"), widget()))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(
        app.catalog.calls(),
        vec![CatalogCall::Update("7".to_string(), parse(widget().to_string().as_bytes()))]
    );
}

#[tokio::test]
async fn test_create_requires_id() {
    let app = test_app(FakeCatalog::new(), FakeStock::new());

    let (status, body) = app
        .send(write("POST", "/api/v1/products", None, json!({"id": " ", "name": "x"})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(parse::<ApiError>(&body).code, ErrorCode::InvalidInput);
    assert_eq!(app.catalog.total_calls(), 0);
}

#[tokio::test]
async fn test_delete_is_not_gated() {
    let app = test_app(FakeCatalog::new(), FakeStock::new());

    for _ in 0..2 {
        let request = Request::delete("/api/v1/products/7")
            .header(IDEMPOTENCY_KEY_HEADER, "same")
            .body(Body::empty())
            .expect("valid request");
        let (status, _) = app.send(request).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }
    assert_eq!(app.catalog.delete_calls(), 2);
}

// ============================================================================
// HEALTH
// ============================================================================

#[tokio::test]
async fn test_health_endpoints() {
    let app = test_app(
        FakeCatalog::with_records(vec![catalog_record("1", "P1", "D1")]),
        FakeStock::new(),
    );
    app.send(get("/api/v1/products")).await;
    app.send(get("/api/v1/products")).await;

    let (status, body) = app.send(get("/health/ping")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse::<serde_json::Value>(&body), json!({"status": "healthy"}));

    let (status, body) = app.send(get("/health/live")).await;
    assert_eq!(status, StatusCode::OK);
    let live: serde_json::Value = parse(&body);
    assert_eq!(live["details"]["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(live["details"]["cache"]["hits"], 1);
    assert_eq!(live["details"]["cache"]["misses"], 1);
}
