//! Observability for the storefront page.
//!
//! This crate provides:
//! - `StructuredLogger` - Structured logging with load context
//! - `LoadMetrics` / `MetricsCollector` - Per-load section, fetch and workload metrics

mod logging;
mod metrics;

pub use logging::*;
pub use metrics::*;

// Re-export LoadId and TimingContext from shop-core for convenience
pub use shop_core::{LoadId, TimingContext};
