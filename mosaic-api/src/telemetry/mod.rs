//! Mosaic Telemetry - Logging Infrastructure
//!
//! Installs the process-wide `tracing` subscriber.

pub mod tracer;

pub use tracer::{init_tracing, LogFormat, TelemetryConfig};
