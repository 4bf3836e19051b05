//! Concurrency Tests for Write Deduplication
//!
//! Concurrent identical writes race on the ledger and the gate from many
//! worker threads; exactly one may reach the catalog.

use std::sync::Arc;
use std::time::Duration;

use axum::http::Method;
use mosaic_api::{IdempotencyGate, ProductOrchestrator, WriteOutcome};
use mosaic_storage::InMemoryCatalogCache;
use mosaic_test_utils::{product, FakeCatalog, FakeStock};

const RACERS: usize = 32;

fn orchestrator(catalog: Arc<FakeCatalog>) -> Arc<ProductOrchestrator> {
    Arc::new(ProductOrchestrator::new(
        catalog,
        Arc::new(FakeStock::new()),
        Arc::new(InMemoryCatalogCache::new()),
        Duration::from_secs(300),
    ))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_identical_creates_post_once() {
    let catalog = Arc::new(FakeCatalog::new().with_write_delay(Duration::from_millis(20)));
    let orchestrator = orchestrator(catalog.clone());
    let payload = product("42", "Widget");

    let handles: Vec<_> = (0..RACERS)
        .map(|_| {
            let orchestrator = orchestrator.clone();
            let payload = payload.clone();
            tokio::spawn(async move { orchestrator.create_product(&payload, Some("race")).await })
        })
        .collect();

    let mut forwarded = 0;
    for handle in handles {
        match handle.await.expect("task panicked") {
            Ok(WriteOutcome::Forwarded { .. }) => forwarded += 1,
            Ok(WriteOutcome::AlreadyHandled) => {}
            Err(e) => panic!("create failed: {}", e),
        }
    }

    assert_eq!(forwarded, 1);
    assert_eq!(catalog.create_calls(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_updates_of_different_products_all_forward() {
    let catalog = Arc::new(FakeCatalog::new());
    let orchestrator = orchestrator(catalog.clone());

    let handles: Vec<_> = (0..RACERS)
        .map(|i| {
            let orchestrator = orchestrator.clone();
            tokio::spawn(async move {
                let id = i.to_string();
                orchestrator
                    .update_product(&id, &product(&id, "Widget"), Some("shared-token"))
                    .await
            })
        })
        .collect();

    for handle in handles {
        let outcome = handle.await.expect("task panicked").expect("update failed");
        assert!(outcome.is_forwarded());
    }
    assert_eq!(catalog.update_calls(), RACERS);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_gate_admits_one() {
    let gate = IdempotencyGate::new();

    let handles: Vec<_> = (0..RACERS)
        .map(|_| {
            let gate = gate.clone();
            tokio::spawn(async move { gate.admit(&Method::POST, Some("gate-race")).is_ok() })
        })
        .collect();

    let mut admitted = 0;
    for handle in handles {
        if handle.await.expect("task panicked") {
            admitted += 1;
        }
    }

    assert_eq!(admitted, 1);
    assert_eq!(gate.len(), 1);
}
