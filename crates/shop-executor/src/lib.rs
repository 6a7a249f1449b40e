//! Cooperative execution on a single-threaded host.
//!
//! This crate provides:
//! - `ChunkedWorkload` - Counted workload advanced one chunk per `step()`
//! - `HostScheduler` - Yield-and-requeue primitive (`TokioScheduler`, `ImmediateScheduler`)
//! - `drive` / `run_to_completion` - Async and synchronous driver loops
//! - `TaskTracker` - Status of the independent units of a page load

mod chunked;
mod scheduler;
mod tasks;

pub use chunked::*;
pub use scheduler::*;
pub use tasks::*;
