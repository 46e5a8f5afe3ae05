//! Immutable configuration shared by a region scanner and its results.

use regex::Regex;

use super::attributes::AttributeClassifier;
use super::placeholder::PlaceholderDetector;

/// Selector of the rule fabricated around CSS attribute values.
pub const CSS_STYLE_RULE: &str = "__";

/// Custom tags whose bodies are style sheets.
pub const DEFAULT_STYLE_TAGS: &[&str] = &["mj-style"];

/// `type` attribute values that keep a `<script>` body executable.
const SCRIPT_TYPE_PATTERN: &str = r#"["'](module|(text|application)/(java|ecma)script)["']"#;

/// Tables and patterns used while scanning and projecting one document.
///
/// Each scanner owns its own configuration, so scans with different custom
/// tags can run side by side.
#[derive(Debug, Clone)]
pub struct EmbeddedConfig {
    style_tags: Vec<String>,
    attributes: AttributeClassifier,
    placeholders: PlaceholderDetector,
    style_rule: String,
    script_type: Regex,
}

impl Default for EmbeddedConfig {
    fn default() -> Self {
        Self {
            style_tags: DEFAULT_STYLE_TAGS.iter().map(|t| t.to_string()).collect(),
            attributes: AttributeClassifier::default(),
            placeholders: PlaceholderDetector::default(),
            style_rule: CSS_STYLE_RULE.to_string(),
            script_type: Regex::new(SCRIPT_TYPE_PATTERN).unwrap(),
        }
    }
}

impl EmbeddedConfig {
    /// Replace the custom style tag names.
    pub fn with_style_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.style_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the attribute classifier.
    pub fn with_attributes(mut self, attributes: AttributeClassifier) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn style_tags(&self) -> &[String] {
        &self.style_tags
    }

    pub fn attributes(&self) -> &AttributeClassifier {
        &self.attributes
    }

    pub fn placeholders(&self) -> &PlaceholderDetector {
        &self.placeholders
    }

    pub fn style_rule(&self) -> &str {
        &self.style_rule
    }

    /// Whether a raw `type` attribute value marks script content as executable.
    pub fn is_script_type(&self, raw_value: &str) -> bool {
        self.script_type.is_match(raw_value)
    }
}
