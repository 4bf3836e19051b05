//! Mosaic Test Utilities
//!
//! Shared test infrastructure for the workspace:
//! - In-memory fakes of the catalog and stock systems that record every call
//! - Proptest generators for products and idempotency tokens
//! - Fixtures for common scenarios

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU16, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use proptest::prelude::*;
use serde_json::{json, Value};

pub use mosaic_core::{Product, UpstreamError, UpstreamSystem};
pub use mosaic_upstream::{CatalogSource, StockSource, WriteStatus};

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ============================================================================
// FAKE CATALOG
// ============================================================================

/// A call observed by [`FakeCatalog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogCall {
    ListAll,
    GetById(String),
    Create(Product),
    Update(String, Product),
    Delete(String),
}

impl CatalogCall {
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            CatalogCall::Create(_) | CatalogCall::Update(..) | CatalogCall::Delete(_)
        )
    }
}

/// In-memory catalog system that records every call.
#[derive(Debug)]
pub struct FakeCatalog {
    records: Mutex<Vec<Value>>,
    calls: Mutex<Vec<CatalogCall>>,
    unreachable: AtomicBool,
    write_status: AtomicU16,
    write_delay: Option<Duration>,
}

impl Default for FakeCatalog {
    fn default() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            unreachable: AtomicBool::new(false),
            write_status: AtomicU16::new(200),
            write_delay: None,
        }
    }
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A catalog holding the given raw records, in order.
    pub fn with_records(records: Vec<Value>) -> Self {
        let catalog = Self::default();
        *locked(&catalog.records) = records;
        catalog
    }

    /// Status returned by every write.
    pub fn with_write_status(self, status: u16) -> Self {
        self.write_status.store(status, Ordering::SeqCst);
        self
    }

    /// Hold every write open for `delay`, widening race windows.
    pub fn with_write_delay(mut self, delay: Duration) -> Self {
        self.write_delay = Some(delay);
        self
    }

    /// Make every call fail with a transport error (or stop failing).
    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    pub fn set_records(&self, records: Vec<Value>) {
        *locked(&self.records) = records;
    }

    /// Every call observed so far, in order.
    pub fn calls(&self) -> Vec<CatalogCall> {
        locked(&self.calls).clone()
    }

    pub fn list_calls(&self) -> usize {
        self.count(|c| matches!(c, CatalogCall::ListAll))
    }

    pub fn create_calls(&self) -> usize {
        self.count(|c| matches!(c, CatalogCall::Create(_)))
    }

    pub fn update_calls(&self) -> usize {
        self.count(|c| matches!(c, CatalogCall::Update(..)))
    }

    pub fn delete_calls(&self) -> usize {
        self.count(|c| matches!(c, CatalogCall::Delete(_)))
    }

    pub fn write_calls(&self) -> usize {
        self.count(CatalogCall::is_write)
    }

    pub fn total_calls(&self) -> usize {
        locked(&self.calls).len()
    }

    fn count(&self, pred: impl Fn(&CatalogCall) -> bool) -> usize {
        locked(&self.calls).iter().filter(|c| pred(*c)).count()
    }

    fn record(&self, call: CatalogCall) -> Result<(), UpstreamError> {
        locked(&self.calls).push(call);
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(UpstreamError::Transport {
                system: UpstreamSystem::Catalog,
                reason: "connection refused".to_string(),
            });
        }
        Ok(())
    }

    async fn finish_write(&self) -> WriteStatus {
        if let Some(delay) = self.write_delay {
            tokio::time::sleep(delay).await;
        }
        WriteStatus(self.write_status.load(Ordering::SeqCst))
    }
}

#[async_trait]
impl CatalogSource for FakeCatalog {
    async fn list_all(&self) -> Result<Vec<Value>, UpstreamError> {
        self.record(CatalogCall::ListAll)?;
        Ok(locked(&self.records).clone())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Value>, UpstreamError> {
        self.record(CatalogCall::GetById(id.to_string()))?;
        let records = locked(&self.records);
        Ok(records
            .iter()
            .find(|r| Product::catalog_id(*r).as_deref() == Some(id))
            .cloned())
    }

    async fn create(&self, product: &Product) -> Result<WriteStatus, UpstreamError> {
        self.record(CatalogCall::Create(product.clone()))?;
        Ok(self.finish_write().await)
    }

    async fn update(&self, id: &str, product: &Product) -> Result<WriteStatus, UpstreamError> {
        self.record(CatalogCall::Update(id.to_string(), product.clone()))?;
        Ok(self.finish_write().await)
    }

    async fn delete(&self, id: &str) -> Result<WriteStatus, UpstreamError> {
        self.record(CatalogCall::Delete(id.to_string()))?;
        Ok(self.finish_write().await)
    }
}

// ============================================================================
// FAKE STOCK
// ============================================================================

/// How [`FakeStock`] answers for one product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockAnswer {
    Level(i64),
    /// Non-success status.
    NotFound,
    /// Transport failure.
    Unreachable,
}

/// In-memory stock system. Unknown ids answer [`StockAnswer::NotFound`].
#[derive(Debug, Default)]
pub struct FakeStock {
    answers: Mutex<HashMap<String, StockAnswer>>,
    lookups: Mutex<Vec<String>>,
}

impl FakeStock {
    pub fn new() -> Self {
        Self::default()
    }

    /// A stock system with a fixed level per id.
    pub fn with_levels<'a>(levels: impl IntoIterator<Item = (&'a str, i64)>) -> Self {
        let stock = Self::default();
        for (id, level) in levels {
            stock.set(id, StockAnswer::Level(level));
        }
        stock
    }

    pub fn set(&self, id: &str, answer: StockAnswer) {
        locked(&self.answers).insert(id.to_string(), answer);
    }

    /// Ids looked up so far, in call order.
    pub fn lookups(&self) -> Vec<String> {
        locked(&self.lookups).clone()
    }

    pub fn total_calls(&self) -> usize {
        locked(&self.lookups).len()
    }
}

#[async_trait]
impl StockSource for FakeStock {
    async fn get_stock(&self, id: &str) -> Result<Option<i64>, UpstreamError> {
        locked(&self.lookups).push(id.to_string());
        let answer = locked(&self.answers)
            .get(id)
            .copied()
            .unwrap_or(StockAnswer::NotFound);
        match answer {
            StockAnswer::Level(level) => Ok(Some(level)),
            StockAnswer::NotFound => Ok(None),
            StockAnswer::Unreachable => Err(UpstreamError::Transport {
                system: UpstreamSystem::Stock,
                reason: "connection reset".to_string(),
            }),
        }
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

/// A raw catalog record in the catalog's lower-case shape.
pub fn catalog_record(id: &str, name: &str, description: &str) -> Value {
    json!({"id": id, "name": name, "description": description})
}

/// A product as a client would submit it.
pub fn product(id: &str, name: &str) -> Product {
    Product {
        id: id.to_string(),
        name: name.to_string(),
        description: None,
        stock: 0,
    }
}

// ============================================================================
// GENERATORS
// ============================================================================

/// Strategy for generating products as clients submit them.
pub fn arb_product() -> impl Strategy<Value = Product> {
    (
        "[a-z0-9]{1,12}",
        "[A-Za-z][A-Za-z0-9 ]{0,30}",
        proptest::option::of("[A-Za-z0-9 .,]{0,60}"),
        0i64..10_000,
    )
        .prop_map(|(id, name, description, stock)| Product {
            id,
            name,
            description,
            stock,
        })
}

/// Strategy for generating idempotency tokens.
pub fn arb_token() -> impl Strategy<Value = String> {
    prop_oneof![
        "[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}",
        "[A-Za-z0-9_-]{1,40}",
    ]
}
