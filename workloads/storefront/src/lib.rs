//! Storefront page.
//!
//! A page load runs three independent units on one cooperative thread:
//! - the country/VAT banner ([`show_top_bar`])
//! - the product catalog ([`load_products`] + [`display_products`])
//! - a simulated heavy calculation split into chunks ([`perform_heavy_calculation`])
//!
//! [`PageLoader`] starts them in that order, reports section failures
//! through an [`ErrorReporter`] and returns the finished document.

mod banner;
mod calculation;
mod cards;
mod catalog;
mod error;
mod loader;
mod page;
mod product;
mod report;

pub use banner::*;
pub use calculation::*;
pub use cards::*;
pub use catalog::*;
pub use error::*;
pub use loader::*;
pub use page::*;
pub use product::*;
pub use report::*;

/// Region that receives the country/VAT banner.
pub const BANNER_SELECTOR: &str = "section.country-bar";

/// Region that holds the product catalog.
pub const PRODUCTS_REGION_SELECTOR: &str = "#all-products";

/// Container the product cards are appended to.
pub const PRODUCTS_CONTAINER_SELECTOR: &str = "#all-products .container";

/// Class marker that hides a region until it is populated.
pub const HIDDEN_CLASS: &str = "hidden";
