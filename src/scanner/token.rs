//! Token stream types shared by every markup scanner.

/// Kind of token produced by a [`MarkupScanner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Name of an opening tag (`div` in `<div class="a">`).
    StartTag,
    /// Name of a closing tag (`div` in `</div>`).
    EndTag,
    /// Attribute name inside an opening tag.
    AttributeName,
    /// Raw attribute value, including its quotes when quoted.
    AttributeValue,
    /// Body of a `<style>` element.
    Styles,
    /// Body of a `<script>` element.
    Script,
    /// Plain text between tags.
    Content,
    /// Comment or `<!...>` declaration.
    Comment,
    /// End of input. Returned for every call once the input is exhausted.
    Eos,
}

/// A single token with byte offsets into the scanned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

impl Token {
    pub fn new(kind: TokenKind, start: usize, end: usize) -> Self {
        Self { kind, start, end }
    }

    /// The raw text of this token within `source`.
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        &source[self.start..self.end]
    }
}

/// A forward-only markup tokenizer.
pub trait MarkupScanner {
    /// Advance to the next token.
    fn scan(&mut self) -> Token;
}

/// Creates scanners over a piece of text.
///
/// Region detection only ever needs a fresh scanner per document, so hosts
/// that own a richer tokenizer can plug it in through this trait.
pub trait ScannerFactory {
    fn create_scanner<'a>(&self, text: &'a str) -> Box<dyn MarkupScanner + 'a>;
}
