//! Virtual documents holding a single embedded language.
//!
//! A projected document has exactly the UTF-16 length and newline positions
//! of its source, so positions reported by a tool run against it are valid
//! positions in the source document as well.

use super::config::EmbeddedConfig;
use super::region::EmbeddedRegion;
use super::{CSS, JAVASCRIPT};

/// Syntax injected around an attribute value so the embedded language's
/// parser accepts it out of context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Wrapper {
    prefix: String,
    suffix: &'static str,
}

const RULE_CLOSE: &str = "}";
const DECLARATION_SEPARATOR: &str = ";";

/// Declaration head for a CSS attribute value: `prop:` for presentation
/// attributes, empty for `style`. `None` if the value is not wrapped at all.
fn declaration(region: &EmbeddedRegion, config: &EmbeddedConfig) -> Option<String> {
    if !region.attribute_value || region.only_placeholders || region.language_id != Some(CSS) {
        return None;
    }
    let name = region.attribute_name.as_deref()?;
    if config.attributes().is_presentation_attribute(name) {
        Some(format!("{}:", config.attributes().css_property(name)))
    } else {
        Some(String::new())
    }
}

/// Wrappers for `region`, most specific first. The last one is always empty.
fn wrappers(region: &EmbeddedRegion, config: &EmbeddedConfig) -> Vec<Wrapper> {
    let mut candidates = Vec::new();
    if region.attribute_value && !region.only_placeholders {
        match region.language_id {
            Some(CSS) => {
                let rule = config.style_rule();
                if let Some(head) = declaration(region, config).filter(|head| !head.is_empty()) {
                    candidates.push(Wrapper {
                        prefix: format!("{rule}{{{head}"),
                        suffix: RULE_CLOSE,
                    });
                }
                candidates.push(Wrapper {
                    prefix: format!("{rule}{{"),
                    suffix: RULE_CLOSE,
                });
            }
            Some(JAVASCRIPT) => candidates.push(Wrapper {
                prefix: String::new(),
                suffix: DECLARATION_SEPARATOR,
            }),
            _ => {}
        }
    }
    candidates.push(Wrapper::default());
    candidates
}

/// What a gap carries: `close` at its start, `open` at its end, and the
/// suffix left pending for the gap after the region.
#[derive(Debug, Default)]
struct Join {
    close: &'static str,
    open: String,
    pending: &'static str,
}

/// Ways to bridge the gap before `region`, preferred first. The last one
/// writes nothing and always fits.
///
/// A CSS attribute value following an open rule continues that rule as
/// another declaration, so consecutive attributes share one rule.
fn joins(
    region: &EmbeddedRegion,
    pending: &'static str,
    config: &EmbeddedConfig,
) -> Vec<Join> {
    let mut candidates = Vec::new();
    if pending == RULE_CLOSE {
        if let Some(head) = declaration(region, config) {
            candidates.push(Join {
                close: DECLARATION_SEPARATOR,
                open: head,
                pending: RULE_CLOSE,
            });
        }
    }
    let wrappers = wrappers(region, config);
    for close in [pending, ""] {
        candidates.extend(wrappers.iter().map(|wrapper| Join {
            close,
            open: wrapper.prefix.clone(),
            pending: wrapper.suffix,
        }));
    }
    candidates
}

fn is_newline(ch: char) -> bool {
    ch == '\n' || ch == '\r'
}

/// Text between two kept regions, measured in UTF-16 code units.
#[derive(Debug)]
struct Gap<'t> {
    text: &'t str,
    units: usize,
    /// Units before the first newline.
    leading: usize,
    /// Units after the last newline.
    trailing: usize,
    has_newline: bool,
}

impl<'t> Gap<'t> {
    fn measure(text: &'t str) -> Self {
        let mut gap = Gap {
            text,
            units: 0,
            leading: 0,
            trailing: 0,
            has_newline: false,
        };
        for ch in text.chars() {
            let width = ch.len_utf16();
            gap.units += width;
            if is_newline(ch) {
                gap.has_newline = true;
                gap.trailing = 0;
            } else {
                gap.trailing += width;
                if !gap.has_newline {
                    gap.leading += width;
                }
            }
        }
        gap
    }

    /// Whether `suffix` fits at the start and `prefix` at the end without
    /// overwriting a newline.
    fn fits(&self, suffix: &str, prefix: &str) -> bool {
        if self.has_newline {
            suffix.len() <= self.leading && prefix.len() <= self.trailing
        } else {
            suffix.len() + prefix.len() <= self.units
        }
    }

    /// Write the gap as blanks: newlines are kept, everything else becomes
    /// spaces, and `suffix` and `prefix` take the place of the first and
    /// last blanks.
    fn write(&self, out: &mut String, suffix: &str, prefix: &str) {
        debug_assert!(self.fits(suffix, prefix));
        out.push_str(suffix);
        let keep = suffix.len()..self.units - prefix.len();
        let mut unit = 0;
        for ch in self.text.chars() {
            if is_newline(ch) {
                out.push(ch);
                unit += 1;
                continue;
            }
            for _ in 0..ch.len_utf16() {
                if keep.contains(&unit) {
                    out.push(' ');
                }
                unit += 1;
            }
        }
        out.push_str(prefix);
    }
}

/// Build the text of the `language_id` virtual document.
///
/// When an injected prefix does not fit into the blank run before its region,
/// a shorter wrapper is used instead, down to no wrapper at all; a suffix
/// that does not fit after its region is dropped. Consecutive CSS attribute
/// values are joined into a single rule with `;` between declarations.
pub(crate) fn project(
    text: &str,
    regions: &[EmbeddedRegion],
    language_id: &str,
    ignore_attribute_values: bool,
    config: &EmbeddedConfig,
) -> String {
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    let mut pending_suffix = "";

    let kept = regions.iter().filter(|region| {
        region.language_id == Some(language_id)
            && !(ignore_attribute_values && region.attribute_value)
    });

    for region in kept {
        debug_assert!(cursor <= region.start);
        let gap = Gap::measure(&text[cursor..region.start]);
        let join = joins(region, pending_suffix, config)
            .into_iter()
            .find(|join| gap.fits(join.close, &join.open))
            .unwrap_or_default();

        gap.write(&mut out, join.close, &join.open);
        out.push_str(&config.placeholders().scrub(&text[region.start..region.end]));
        cursor = region.end;
        pending_suffix = join.pending;
    }

    let gap = Gap::measure(&text[cursor..]);
    let suffix = if gap.fits(pending_suffix, "") {
        pending_suffix
    } else {
        ""
    };
    gap.write(&mut out, suffix, "");
    out
}
