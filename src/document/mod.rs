//! Document snapshots and text utilities.
//!
//! This module provides:
//! - `LineIndex` for byte offset <-> LSP position conversion
//! - `DocumentStore` for caching region indexes of open documents

mod store;
mod text;

pub use store::DocumentStore;
pub use text::LineIndex;
