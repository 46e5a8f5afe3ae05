//! Detection of template placeholder filler.
//!
//! Template tooling replaces interpolated expressions with runs of `x`
//! characters. Content made only of such runs is filler, not code.

use std::borrow::Cow;

use regex::{Captures, Regex};

const PLACEHOLDER_LINE: &str = r"^ *x{3,}(?: *x{3,})* *$";

#[derive(Debug, Clone)]
pub struct PlaceholderDetector {
    /// Matches one whole line of filler.
    line: Regex,
    /// Matches every filler line inside a larger text.
    lines: Regex,
}

impl Default for PlaceholderDetector {
    fn default() -> Self {
        Self {
            line: Regex::new(PLACEHOLDER_LINE).unwrap(),
            lines: Regex::new(&format!("(?mR){PLACEHOLDER_LINE}")).unwrap(),
        }
    }
}

impl PlaceholderDetector {
    /// True if every line of `text` is filler. Blank first and last lines,
    /// as left by a block whose tags sit on their own lines, are ignored.
    /// Text without any filler line is not filler.
    pub fn is_only_placeholders(&self, text: &str) -> bool {
        let mut lines: Vec<&str> = text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .collect();
        if lines.len() > 1 && is_blank(lines[lines.len() - 1]) {
            lines.pop();
        }
        if lines.len() > 1 && is_blank(lines[0]) {
            lines.remove(0);
        }
        lines.iter().all(|line| self.line.is_match(line))
    }

    /// Replace every filler line with spaces of the same length.
    pub fn scrub<'t>(&self, text: &'t str) -> Cow<'t, str> {
        self.lines
            .replace_all(text, |caps: &Captures| " ".repeat(caps[0].len()))
    }
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}
