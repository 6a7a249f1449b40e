//! Core types for the storefront page.
//!
//! This crate provides the fundamental types shared by every other crate:
//! - `StorefrontConfig` - Banner, catalog, workload and error settings
//! - `LoadId` - Identifier attached to one page load
//! - `TimingContext` / `LoadPhase` - Page load timing

mod config;
mod context;
mod lifecycle;

pub use config::*;
pub use context::*;
pub use lifecycle::*;
