//! Classification of attribute names into embedded languages.

use std::collections::HashSet;

use super::{CSS, JAVASCRIPT};

/// MJML attributes whose values are CSS property values.
pub const CSS_ATTRIBUTES: &[&str] = &[
    "align",
    "color",
    "container-background-color",
    "border",
    "border-top",
    "border-left",
    "border-right",
    "border-bottom",
    "border-radius",
    "tb-border",
    "tb-border-radius",
    "tb-hover-border-color",
    "tb-selected-border-color",
    "tb-width",
    "background-color",
    "icon-width",
    "icon-height",
    "icon-position",
    "padding",
    "padding-top",
    "padding-left",
    "padding-right",
    "padding-bottom",
    "font-family",
    "font-size",
    "font-style",
    "font-weight",
    "height",
    "inner-padding",
    "line-height",
    "text-align",
    "text-decoration",
    "text-transform",
    "vertical-align",
    "width",
];

/// Prefix of the hover/selected state variants of presentation attributes.
pub const VENDOR_PREFIX: &str = "tb-";

/// Keywords that collapse a family of attributes onto one CSS property.
const SHORTHAND_PROPERTIES: &[&str] = &["color", "padding", "width", "height", "position"];

/// Maps attribute names to the language of their values.
#[derive(Debug, Clone)]
pub struct AttributeClassifier {
    /// Lower-cased presentation attribute names.
    css_attributes: HashSet<String>,
    vendor_prefix: String,
}

impl Default for AttributeClassifier {
    fn default() -> Self {
        Self::new(CSS_ATTRIBUTES.iter().copied(), VENDOR_PREFIX)
    }
}

impl AttributeClassifier {
    pub fn new<I, S>(css_attributes: I, vendor_prefix: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            css_attributes: css_attributes
                .into_iter()
                .map(|name| name.as_ref().to_ascii_lowercase())
                .collect(),
            vendor_prefix: vendor_prefix.to_ascii_lowercase(),
        }
    }

    fn strip_vendor_prefix<'n>(&self, name: &'n str) -> &'n str {
        name.strip_prefix(self.vendor_prefix.as_str()).unwrap_or(name)
    }

    /// Whether `name` is a presentation attribute, with or without the vendor prefix.
    pub fn is_presentation_attribute(&self, name: &str) -> bool {
        let name = name.to_ascii_lowercase();
        self.css_attributes.contains(&name)
            || self.css_attributes.contains(self.strip_vendor_prefix(&name))
    }

    /// Language of the values of attribute `name`, if any.
    pub fn classify(&self, name: &str) -> Option<&'static str> {
        if self.is_presentation_attribute(name) || name.eq_ignore_ascii_case("style") {
            Some(CSS)
        } else if is_event_handler(name) {
            Some(JAVASCRIPT)
        } else {
            None
        }
    }

    /// CSS property used when a presentation attribute value is wrapped in a rule.
    pub fn css_property(&self, name: &str) -> String {
        let name = name.trim().to_ascii_lowercase();
        let name = self.strip_vendor_prefix(&name);
        SHORTHAND_PROPERTIES
            .iter()
            .find(|keyword| name.contains(*keyword))
            .map(|keyword| (*keyword).to_string())
            .unwrap_or_else(|| name.to_string())
    }
}

/// `on` followed by one or more word characters, like `onclick`.
fn is_event_handler(name: &str) -> bool {
    let bytes = name.as_bytes();
    bytes.len() > 2
        && bytes[..2].eq_ignore_ascii_case(b"on")
        && bytes[2..]
            .iter()
            .all(|b| b.is_ascii_alphanumeric() || *b == b'_')
}
