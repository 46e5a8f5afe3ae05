//! Embedded CSS and JavaScript regions in MJML documents.
//!
//! A [`RegionScanner`] walks an MJML document once and records where style
//! sheets, scripts and language-bearing attribute values live. The resulting
//! [`DocumentRegions`] answer which language owns a position and synthesize
//! virtual documents that contain a single embedded language, blanked so that
//! every position in them is also a position in the source document.

mod document;
mod embedded;
mod scanner;
mod settings;

pub use document::{DocumentStore, LineIndex};
pub use embedded::{
    AttributeClassifier, DocumentRegions, EmbeddedConfig, EmbeddedRegion, LanguageRange,
    PlaceholderDetector, RegionScanner, CSS, CSS_ATTRIBUTES, CSS_STYLE_RULE, DEFAULT_STYLE_TAGS,
    HTML, JAVASCRIPT, VENDOR_PREFIX,
};
pub use scanner::{HtmlScanner, HtmlScannerFactory, MarkupScanner, ScannerFactory, Token, TokenKind};
pub use settings::{
    discover_settings, load_settings, FormatSettings, Settings, SettingsError, SETTINGS_FILE,
};

pub use tower_lsp::lsp_types;
