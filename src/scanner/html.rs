//! Hand-written tokenizer for HTML-like markup.
//!
//! The scanner walks bytes and only ever cuts at ASCII structural characters,
//! so every token boundary is a valid UTF-8 char boundary.

use super::find_ignore_ascii_case;
use super::token::{MarkupScanner, ScannerFactory, Token, TokenKind};

const COMMENT_OPEN: &[u8] = b"<!--";
const COMMENT_CLOSE: &str = "-->";
const SCRIPT_CLOSE: &[u8] = b"</script";
const STYLE_CLOSE: &[u8] = b"</style";

/// Elements whose body is raw text rather than markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RawText {
    Script,
    Style,
}

impl RawText {
    fn from_tag_name(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("script") {
            Some(Self::Script)
        } else if name.eq_ignore_ascii_case("style") {
            Some(Self::Style)
        } else {
            None
        }
    }

    fn close_marker(self) -> &'static [u8] {
        match self {
            Self::Script => SCRIPT_CLOSE,
            Self::Style => STYLE_CLOSE,
        }
    }

    fn token_kind(self) -> TokenKind {
        match self {
            Self::Script => TokenKind::Script,
            Self::Style => TokenKind::Styles,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    WithinContent,
    WithinEndTag,
    WithinTag,
    AfterAttributeName,
    BeforeAttributeValue,
    WithinRawText(RawText),
}

/// Streaming HTML tokenizer.
#[derive(Debug, Clone)]
pub struct HtmlScanner<'a> {
    source: &'a str,
    pos: usize,
    state: State,
    /// Raw-text element opened by the tag currently being scanned.
    pending_raw_text: Option<RawText>,
}

impl<'a> HtmlScanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            state: State::WithinContent,
            pending_raw_text: None,
        }
    }

    fn bytes(&self) -> &'a [u8] {
        self.source.as_bytes()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn peek(&self) -> Option<u8> {
        self.bytes().get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    /// Advance while `pred` holds, returning the start of the skipped run.
    fn take_while(&mut self, pred: impl Fn(u8) -> bool) -> usize {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.pos += 1;
        }
        start
    }

    fn token(&self, kind: TokenKind, start: usize) -> Token {
        Token::new(kind, start, self.pos)
    }

    fn eos(&self) -> Token {
        let len = self.source.len();
        Token::new(TokenKind::Eos, len, len)
    }

    /// Scan at a `<` in content. Returns `None` when the `<` does not open
    /// any markup construct and should be read as text.
    fn scan_markup(&mut self) -> Option<Token> {
        let bytes = self.bytes();
        let start = self.pos;
        let rest = &bytes[start..];

        if rest.starts_with(COMMENT_OPEN) {
            let body = start + COMMENT_OPEN.len();
            self.pos = self.source[body..]
                .find(COMMENT_CLOSE)
                .map(|i| body + i + COMMENT_CLOSE.len())
                .unwrap_or(bytes.len());
            return Some(self.token(TokenKind::Comment, start));
        }

        if rest.get(1) == Some(&b'!') {
            self.pos = self.source[start..]
                .find('>')
                .map(|i| start + i + 1)
                .unwrap_or(bytes.len());
            return Some(self.token(TokenKind::Comment, start));
        }

        if rest.get(1) == Some(&b'/') {
            self.pos = start + 2;
            let name_start = self.take_while(is_tag_name_char);
            if name_start == self.pos {
                self.pos = start;
                return None;
            }
            let token = self.token(TokenKind::EndTag, name_start);
            self.state = State::WithinEndTag;
            return Some(token);
        }

        if rest.get(1).is_some_and(|b| b.is_ascii_alphabetic()) {
            self.pos = start + 1;
            let name_start = self.take_while(is_tag_name_char);
            let token = self.token(TokenKind::StartTag, name_start);
            self.pending_raw_text = RawText::from_tag_name(token.text(self.source));
            self.state = State::WithinTag;
            return Some(token);
        }

        None
    }

    fn scan_content(&mut self) -> Token {
        let start = self.pos;
        // A lone `<` that opens nothing is part of the text.
        self.pos += 1;
        while self.peek().is_some_and(|b| b != b'<') {
            self.pos += 1;
        }
        self.token(TokenKind::Content, start)
    }

    fn scan_attribute_value(&mut self) -> Option<Token> {
        let start = self.pos;
        match self.peek()? {
            quote @ (b'"' | b'\'') => {
                self.pos = self.bytes()[start + 1..]
                    .iter()
                    .position(|&b| b == quote)
                    .map(|i| start + 1 + i + 1)
                    .unwrap_or(self.source.len());
                Some(self.token(TokenKind::AttributeValue, start))
            }
            _ => {
                self.take_while(is_unquoted_value_char);
                // `<a href=x/>` self-closes; the slash is not part of the value.
                if self.pos > start
                    && self.bytes()[self.pos - 1] == b'/'
                    && self.peek() == Some(b'>')
                {
                    self.pos -= 1;
                }
                if self.pos == start {
                    None
                } else {
                    Some(self.token(TokenKind::AttributeValue, start))
                }
            }
        }
    }
}

impl MarkupScanner for HtmlScanner<'_> {
    fn scan(&mut self) -> Token {
        loop {
            if self.at_end() {
                return self.eos();
            }

            match self.state {
                State::WithinContent => {
                    if self.peek() == Some(b'<') {
                        if let Some(token) = self.scan_markup() {
                            return token;
                        }
                    }
                    return self.scan_content();
                }
                State::WithinEndTag => {
                    self.take_while(|b| b != b'>');
                    if !self.at_end() {
                        self.pos += 1;
                    }
                    self.state = State::WithinContent;
                }
                State::WithinTag => {
                    self.skip_whitespace();
                    match self.peek() {
                        None => {}
                        Some(b'>') => {
                            self.pos += 1;
                            self.state = match self.pending_raw_text.take() {
                                Some(raw) => State::WithinRawText(raw),
                                None => State::WithinContent,
                            };
                        }
                        Some(b'/') if self.bytes().get(self.pos + 1) == Some(&b'>') => {
                            self.pos += 2;
                            self.pending_raw_text = None;
                            self.state = State::WithinContent;
                        }
                        Some(b'<') => {
                            // Unclosed tag; the `<` starts the next construct.
                            self.pending_raw_text = None;
                            self.state = State::WithinContent;
                        }
                        Some(b) if is_attribute_name_char(b) => {
                            let start = self.take_while(is_attribute_name_char);
                            self.state = State::AfterAttributeName;
                            return self.token(TokenKind::AttributeName, start);
                        }
                        Some(_) => self.pos += 1,
                    }
                }
                State::AfterAttributeName => {
                    self.skip_whitespace();
                    if self.peek() == Some(b'=') {
                        self.pos += 1;
                        self.state = State::BeforeAttributeValue;
                    } else {
                        self.state = State::WithinTag;
                    }
                }
                State::BeforeAttributeValue => {
                    self.skip_whitespace();
                    self.state = State::WithinTag;
                    if let Some(token) = self.scan_attribute_value() {
                        return token;
                    }
                }
                State::WithinRawText(raw) => {
                    let start = self.pos;
                    self.pos = find_ignore_ascii_case(self.bytes(), start, raw.close_marker())
                        .unwrap_or(self.source.len());
                    self.state = State::WithinContent;
                    if self.pos > start {
                        return self.token(raw.token_kind(), start);
                    }
                }
            }
        }
    }
}

fn is_tag_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b':' | b'.') || !b.is_ascii()
}

fn is_attribute_name_char(b: u8) -> bool {
    !b.is_ascii_whitespace() && !matches!(b, b'"' | b'\'' | b'>' | b'/' | b'=' | b'<')
}

fn is_unquoted_value_char(b: u8) -> bool {
    !b.is_ascii_whitespace() && !matches!(b, b'"' | b'\'' | b'`' | b'=' | b'<' | b'>')
}

/// Factory for the built-in [`HtmlScanner`].
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlScannerFactory;

impl ScannerFactory for HtmlScannerFactory {
    fn create_scanner<'a>(&self, text: &'a str) -> Box<dyn MarkupScanner + 'a> {
        Box::new(HtmlScanner::new(text))
    }
}
