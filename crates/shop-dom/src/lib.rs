//! In-memory document tree standing in for the browser DOM.
//!
//! This crate provides:
//! - `VNode` / `VElement` - Detached, pure UI trees produced by renderers
//! - `Fragment` - A batch of trees appended in one mutation
//! - `Document` - Live `scraper` tree with class markers and a mutation log
//! - CSS selector lookup through `scraper::Selector`
//! - HTML serialization with escaping

mod document;
mod html;
mod node;

pub use document::*;
pub use html::{escape_attr, escape_text};
pub use node::*;
pub use scraper::Selector;
