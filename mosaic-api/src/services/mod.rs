//! Service Layer
//!
//! Business logic sitting between the HTTP handlers and the upstream
//! systems. Handlers stay thin; everything with an invariant lives here.

mod product_orchestrator;

pub use product_orchestrator::*;
