//! Region detection over a markup token stream.

use std::borrow::Cow;
use std::ops::Range;
use std::sync::Arc;

use tower_lsp::lsp_types::TextDocumentItem;
use tracing::{debug, trace, warn};

use crate::scanner::{find_ignore_ascii_case, HtmlScannerFactory, ScannerFactory, TokenKind};

use super::config::EmbeddedConfig;
use super::regions::DocumentRegions;
use super::{CSS, JAVASCRIPT};

const STANDARD_STYLE_TAG: &str = "style";
const INCLUDE_TAG: &str = "mj-include";
const INCLUDE_PATH_ATTRIBUTE: &str = "path";
const SCRIPT_TAG: &str = "script";
const SCRIPT_TYPE_ATTRIBUTE: &str = "type";

/// One classified span of the original document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedRegion {
    /// Embedded language owning the span. `None` for script blocks whose
    /// `type` marks them as non-executable.
    pub language_id: Option<&'static str>,
    /// Byte offset where the span starts.
    pub start: usize,
    /// Byte offset where the span ends (exclusive).
    pub end: usize,
    /// The span consists of template placeholder filler only.
    pub only_placeholders: bool,
    /// The span is an attribute value rather than a style or script body.
    pub attribute_value: bool,
    /// Name of the owning attribute for attribute values.
    pub attribute_name: Option<String>,
}

impl EmbeddedRegion {
    pub fn span(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Whether `offset` lies within the region. The end bound is inclusive so
    /// a cursor right after the last character still belongs to the region.
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset <= self.end
    }
}

/// Scans markup documents into [`DocumentRegions`].
#[derive(Debug, Clone, Default)]
pub struct RegionScanner {
    config: Arc<EmbeddedConfig>,
}

impl RegionScanner {
    pub fn new(config: EmbeddedConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &EmbeddedConfig {
        &self.config
    }

    /// Scan a document with the built-in HTML scanner.
    pub fn scan(&self, document: TextDocumentItem) -> DocumentRegions {
        self.scan_with(document, &HtmlScannerFactory)
    }

    /// Scan a document with a caller-supplied tokenizer.
    pub fn scan_with(
        &self,
        document: TextDocumentItem,
        factory: &dyn ScannerFactory,
    ) -> DocumentRegions {
        let (regions, imported_scripts) = self.collect(&document.text, factory);
        debug!(
            uri = %document.uri,
            version = document.version,
            regions = regions.len(),
            imported_scripts = imported_scripts.len(),
            "scanned document regions"
        );
        DocumentRegions::new(document, regions, imported_scripts, Arc::clone(&self.config))
    }

    /// Walk the token stream once, returning regions and `mj-include` paths.
    fn collect(
        &self,
        text: &str,
        factory: &dyn ScannerFactory,
    ) -> (Vec<EmbeddedRegion>, Vec<String>) {
        let config = &*self.config;
        let scanned = substitute_style_tags(text, config.style_tags());
        debug_assert_eq!(scanned.len(), text.len());

        let mut scanner = factory.create_scanner(&scanned);
        let mut regions: Vec<EmbeddedRegion> = Vec::new();
        let mut imported_scripts = Vec::new();
        let mut last_tag_name = String::new();
        let mut last_attribute_name: Option<String> = None;
        let mut script_language = Some(JAVASCRIPT);

        // Offsets are identical in `scanned` and `text`; region content is
        // always read from the original.
        let mut push = |region: EmbeddedRegion| {
            trace!(?region, "embedded region");
            debug_assert!(regions.last().map_or(true, |last| last.end <= region.start));
            regions.push(region);
        };

        loop {
            let token = scanner.scan();
            match token.kind {
                TokenKind::Eos => break,
                TokenKind::StartTag => {
                    last_tag_name = token.text(&scanned).to_ascii_lowercase();
                    last_attribute_name = None;
                    script_language = Some(JAVASCRIPT);
                }
                TokenKind::Styles | TokenKind::Script => {
                    let language_id = if token.kind == TokenKind::Styles {
                        Some(CSS)
                    } else {
                        script_language
                    };
                    push(EmbeddedRegion {
                        language_id,
                        start: token.start,
                        end: token.end,
                        only_placeholders: config
                            .placeholders()
                            .is_only_placeholders(&text[token.start..token.end]),
                        attribute_value: false,
                        attribute_name: None,
                    });
                }
                TokenKind::AttributeName => {
                    last_attribute_name = Some(token.text(&scanned).to_string());
                }
                TokenKind::AttributeValue => {
                    let Some(attribute) = last_attribute_name.take() else {
                        continue;
                    };
                    let raw = &text[token.start..token.end];

                    if attribute.eq_ignore_ascii_case(INCLUDE_PATH_ATTRIBUTE)
                        && last_tag_name == INCLUDE_TAG
                    {
                        imported_scripts.push(strip_quotes(raw).to_string());
                    } else if attribute.eq_ignore_ascii_case(SCRIPT_TYPE_ATTRIBUTE)
                        && last_tag_name == SCRIPT_TAG
                    {
                        script_language = config.is_script_type(raw).then_some(JAVASCRIPT);
                    } else if let Some(language_id) = config.attributes().classify(&attribute) {
                        let (start, end) = if is_quoted(raw) {
                            (token.start + 1, token.end - 1)
                        } else {
                            (token.start, token.end)
                        };
                        push(EmbeddedRegion {
                            language_id: Some(language_id),
                            start,
                            end,
                            only_placeholders: config
                                .placeholders()
                                .is_only_placeholders(&text[start..end]),
                            attribute_value: true,
                            attribute_name: Some(attribute),
                        });
                    }
                }
                _ => {}
            }
        }

        (regions, imported_scripts)
    }
}

fn is_quote(b: u8) -> bool {
    b == b'"' || b == b'\''
}

/// Whether a raw attribute value starts and ends with a quote character.
///
/// The two quotes are not required to match each other.
fn is_quoted(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.len() >= 2 && is_quote(bytes[0]) && is_quote(bytes[bytes.len() - 1])
}

fn strip_quotes(raw: &str) -> &str {
    if is_quoted(raw) {
        &raw[1..raw.len() - 1]
    } else {
        raw
    }
}

/// Rewrite custom style tags as `style` tags without moving any offset.
///
/// `<mj-style` becomes `<style   ` and `</mj-style` becomes `</style   `, so a
/// generic scanner reports the body as a style block.
fn substitute_style_tags<'t>(text: &'t str, style_tags: &[String]) -> Cow<'t, str> {
    let bytes = text.as_bytes();
    let mut replacements: Vec<(usize, String)> = Vec::new();

    for tag in style_tags {
        if !tag.is_ascii() || tag.len() < STANDARD_STYLE_TAG.len() {
            warn!(tag = %tag, "custom style tag cannot be rewritten in place, ignoring");
            continue;
        }
        let padding = " ".repeat(tag.len() - STANDARD_STYLE_TAG.len());
        for opener in ["<", "</"] {
            let marker = format!("{opener}{tag}");
            let replacement = format!("{opener}{STANDARD_STYLE_TAG}{padding}");
            debug_assert_eq!(marker.len(), replacement.len());

            let mut from = 0;
            while let Some(at) = find_ignore_ascii_case(bytes, from, marker.as_bytes()) {
                let end = at + marker.len();
                if !bytes.get(end).copied().is_some_and(continues_tag_name) {
                    replacements.push((at, replacement.clone()));
                }
                from = end;
            }
        }
    }

    if replacements.is_empty() {
        return Cow::Borrowed(text);
    }
    let mut scanned = text.to_string();
    for (at, replacement) in replacements {
        scanned.replace_range(at..at + replacement.len(), &replacement);
    }
    Cow::Owned(scanned)
}

fn continues_tag_name(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b':' | b'.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::{MarkupScanner, Token};
    use tower_lsp::lsp_types::Url;

    fn scan(text: &str) -> DocumentRegions {
        let uri = Url::parse("file:///template.mjml").unwrap();
        RegionScanner::default().scan(TextDocumentItem::new(uri, "mjml".into(), 1, text.into()))
    }

    fn spans(text: &str) -> Vec<(Option<&'static str>, &str, bool)> {
        let doc = scan(text);
        doc.regions()
            .iter()
            .map(|r| (r.language_id, &text[r.span()], r.attribute_value))
            .collect()
    }

    #[test]
    fn substitution_preserves_length() {
        let text = "<mj-style inline=\"inline\">.a{}</MJ-STYLE>";
        let tags = vec!["mj-style".to_string()];
        let scanned = substitute_style_tags(text, &tags);
        assert_eq!(scanned, "<style    inline=\"inline\">.a{}</style   >");
        assert_eq!(scanned.len(), text.len());
    }

    #[test]
    fn substitution_requires_whole_tag_name() {
        let tags = vec!["mj-style".to_string()];
        let text = "<mj-styles>.a{}</mj-styles>";
        assert!(matches!(substitute_style_tags(text, &tags), Cow::Borrowed(_)));
    }

    #[test]
    fn short_custom_tags_are_ignored() {
        let tags = vec!["css".to_string()];
        let text = "<css>.a{}</css>";
        assert_eq!(substitute_style_tags(text, &tags), text);
    }

    #[test]
    fn style_block_region() {
        assert_eq!(
            spans("<mj-style>.a{color:red}</mj-style>"),
            vec![(Some(CSS), ".a{color:red}", false)]
        );
    }

    #[test]
    fn attribute_regions_exclude_quotes() {
        assert_eq!(
            spans(r#"<mj-text color="red" padding='4px' align=left css-class="x">"#),
            vec![
                (Some(CSS), "red", true),
                (Some(CSS), "4px", true),
                (Some(CSS), "left", true),
            ]
        );
    }

    /// Replays a fixed token list, standing in for a foreign tokenizer.
    struct ReplayScanner(std::vec::IntoIter<Token>);

    impl MarkupScanner for ReplayScanner {
        fn scan(&mut self) -> Token {
            self.0.next().unwrap_or(Token::new(TokenKind::Eos, 0, 0))
        }
    }

    struct ReplayFactory(Vec<Token>);

    impl ScannerFactory for ReplayFactory {
        fn create_scanner<'a>(&self, _text: &'a str) -> Box<dyn MarkupScanner + 'a> {
            Box::new(ReplayScanner(self.0.clone().into_iter()))
        }
    }

    #[test]
    fn mismatched_quotes_are_still_trimmed() {
        let text = r#"<p style="a'>"#;
        let factory = ReplayFactory(vec![
            Token::new(TokenKind::StartTag, 1, 2),
            Token::new(TokenKind::AttributeName, 3, 8),
            Token::new(TokenKind::AttributeValue, 9, 12),
        ]);
        let uri = Url::parse("file:///template.mjml").unwrap();
        let doc = RegionScanner::default().scan_with(
            TextDocumentItem::new(uri, "mjml".into(), 1, text.into()),
            &factory,
        );
        assert_eq!(doc.regions().len(), 1);
        assert_eq!(doc.regions()[0].span(), 10..11);
    }

    #[test]
    fn unterminated_value_is_not_trimmed() {
        assert_eq!(
            spans(r#"<p style="color:red"#),
            vec![(Some(CSS), r#""color:red"#, true)]
        );
    }

    #[test]
    fn script_type_controls_language() {
        assert_eq!(
            spans(r#"<script type="text/plain">a</script><script>b</script><script type='module'>c</script>"#),
            vec![
                (None, "a", false),
                (Some(JAVASCRIPT), "b", false),
                (Some(JAVASCRIPT), "c", false),
            ]
        );
    }

    #[test]
    fn script_language_resets_on_next_start_tag() {
        let doc = scan(r#"<script type="text/html"></script><div></div><script>x</script>"#);
        assert_eq!(doc.regions().len(), 1);
        assert_eq!(doc.regions()[0].language_id, Some(JAVASCRIPT));
    }

    #[test]
    fn event_handlers_are_javascript() {
        assert_eq!(
            spans(r#"<button onclick="go()" onMouseOver='hover()'>"#),
            vec![
                (Some(JAVASCRIPT), "go()", true),
                (Some(JAVASCRIPT), "hover()", true),
            ]
        );
    }

    #[test]
    fn include_paths_are_collected() {
        let doc = scan(
            r#"<mj-include path="./header.mjml" /><MJ-INCLUDE path='footer.mjml'/><mj-include path=raw.css type="css">"#,
        );
        assert!(doc.regions().is_empty());
        assert_eq!(
            doc.imported_scripts(),
            ["./header.mjml", "footer.mjml", "raw.css"]
        );
    }

    #[test]
    fn unquoted_values_stop_before_self_close() {
        let doc = scan("<mj-include path=foo.mjml/><mj-text color=red/>");
        assert_eq!(doc.imported_scripts(), ["foo.mjml"]);
        assert_eq!(spans("<mj-text color=red/>"), vec![(Some(CSS), "red", true)]);
    }

    #[test]
    fn path_on_other_tags_is_ignored() {
        let doc = scan(r#"<mj-image path="a.png" />"#);
        assert!(doc.imported_scripts().is_empty());
    }

    #[test]
    fn placeholder_regions_are_flagged() {
        let doc = scan(r#"<mj-style> xxxxx </mj-style><p style="xxx">"#);
        let flags: Vec<_> = doc.regions().iter().map(|r| r.only_placeholders).collect();
        assert_eq!(flags, vec![true, true]);
    }

    #[test]
    fn attribute_name_is_recorded() {
        let doc = scan(r##"<mj-button tb-hover-border-color="#fff">"##);
        let region = &doc.regions()[0];
        assert_eq!(region.attribute_name.as_deref(), Some("tb-hover-border-color"));
        assert!(region.contains(region.start));
        assert!(region.contains(region.end));
        assert!(!region.contains(region.end + 1));
    }

    #[test]
    fn regions_are_ordered_and_disjoint() {
        let doc = scan(
            r#"<mj-section padding="0"><mj-style>.a{}</mj-style><mj-text color="red" onclick="x()">hi</mj-text><script>y()</script></mj-section>"#,
        );
        let regions = doc.regions();
        assert_eq!(regions.len(), 5);
        assert!(regions.windows(2).all(|w| w[0].end <= w[1].start));
    }
}
