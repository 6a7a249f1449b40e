//! Outbound data access for the storefront.
//!
//! This crate provides:
//! - `FetchClient` - One-shot JSON GET with load-id correlation
//! - `HttpTransport` - Transport seam (`ReqwestTransport`, `StaticTransport`)
//! - `FetchError` - Transport, status and parse failures
//!
//! There is no retry or timeout layer: a request either completes or
//! fails once.

mod client;
mod error;
mod transport;

pub use client::*;
pub use error::*;
pub use transport::*;
