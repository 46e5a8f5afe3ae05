//! Markup tokenization.
//!
//! This module provides:
//! - `MarkupScanner` and `ScannerFactory`, the seam through which region
//!   detection consumes a token stream
//! - `HtmlScanner`, the built-in tokenizer for HTML-like markup (MJML included)

mod html;
mod token;

pub use html::{HtmlScanner, HtmlScannerFactory};
pub use token::{MarkupScanner, ScannerFactory, Token, TokenKind};

/// Find `needle` in `haystack` at or after `from`, comparing ASCII case-insensitively.
///
/// `needle` must be ASCII and start with `<`, which never occurs inside a
/// UTF-8 continuation byte, so the returned offset is always a char boundary.
pub(crate) fn find_ignore_ascii_case(haystack: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    debug_assert!(needle.is_ascii() && needle.first() == Some(&b'<'));
    let n = needle.len();
    let mut i = from;
    while i + n <= haystack.len() {
        let rel = haystack[i..].iter().position(|&b| b == b'<')?;
        i += rel;
        if i + n > haystack.len() {
            return None;
        }
        if haystack[i..i + n].eq_ignore_ascii_case(needle) {
            return Some(i);
        }
        i += 1;
    }
    None
}
