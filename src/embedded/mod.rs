//! Embedded language regions inside MJML documents.
//!
//! This module provides:
//! - `RegionScanner`, which walks a markup token stream once and classifies
//!   style blocks, script blocks and language-bearing attribute values
//! - `DocumentRegions`, the resulting region index with its query operations
//!   (virtual documents, language ranges, language at a position)
//! - `AttributeClassifier` and `PlaceholderDetector`, the pure helpers the
//!   scanner and projector share through `EmbeddedConfig`

mod attributes;
mod config;
mod placeholder;
mod projection;
mod ranges;
mod region;
mod regions;

pub use attributes::{AttributeClassifier, CSS_ATTRIBUTES, VENDOR_PREFIX};
pub use config::{EmbeddedConfig, CSS_STYLE_RULE, DEFAULT_STYLE_TAGS};
pub use placeholder::PlaceholderDetector;
pub use ranges::LanguageRange;
pub use region::{EmbeddedRegion, RegionScanner};
pub use regions::DocumentRegions;

/// Language id of the host markup.
pub const HTML: &str = "html";
/// Language id of embedded style sheets and style attributes.
pub const CSS: &str = "css";
/// Language id of embedded scripts and event handler attributes.
pub const JAVASCRIPT: &str = "javascript";
