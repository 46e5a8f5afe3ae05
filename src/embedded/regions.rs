//! The region index of one document version and its queries.

use std::sync::Arc;

use tower_lsp::lsp_types::{Position, Range, TextDocumentItem, Url};

use crate::document::LineIndex;

use super::config::EmbeddedConfig;
use super::projection::project;
use super::ranges::{self, LanguageRange};
use super::region::EmbeddedRegion;
use super::HTML;

/// Embedded regions of one document snapshot.
///
/// Built by [`RegionScanner`](super::RegionScanner) and immutable afterwards;
/// a new document version needs a new scan.
#[derive(Debug, Clone)]
pub struct DocumentRegions {
    uri: Url,
    language_id: String,
    version: i32,
    line_index: LineIndex,
    regions: Vec<EmbeddedRegion>,
    imported_scripts: Vec<String>,
    config: Arc<EmbeddedConfig>,
}

impl DocumentRegions {
    pub(crate) fn new(
        document: TextDocumentItem,
        regions: Vec<EmbeddedRegion>,
        imported_scripts: Vec<String>,
        config: Arc<EmbeddedConfig>,
    ) -> Self {
        Self {
            uri: document.uri,
            language_id: document.language_id,
            version: document.version,
            line_index: LineIndex::new(document.text),
            regions,
            imported_scripts,
            config,
        }
    }

    pub fn uri(&self) -> &Url {
        &self.uri
    }

    /// Language id of the source document itself.
    pub fn language_id(&self) -> &str {
        &self.language_id
    }

    pub fn version(&self) -> i32 {
        self.version
    }

    pub fn text(&self) -> &str {
        self.line_index.text()
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.line_index
    }

    /// Regions in ascending, non-overlapping order.
    pub fn regions(&self) -> &[EmbeddedRegion] {
        &self.regions
    }

    /// Virtual document containing only the `language_id` regions.
    ///
    /// Everything else is blanked while line breaks are kept, so the result
    /// has the same UTF-16 length and line structure as the source. With
    /// `ignore_attribute_values`, attribute value regions are blanked too.
    pub fn embedded_document(
        &self,
        language_id: &str,
        ignore_attribute_values: bool,
    ) -> TextDocumentItem {
        let text = project(
            self.text(),
            &self.regions,
            language_id,
            ignore_attribute_values,
            &self.config,
        );
        TextDocumentItem::new(self.uri.clone(), language_id.to_string(), self.version, text)
    }

    /// Language owning `position`. Positions outside any region, or outside
    /// the document, belong to the host markup.
    pub fn language_at_position(&self, position: Position) -> Option<&'static str> {
        match self.line_index.position_to_offset(position) {
            Some(offset) => ranges::language_at_offset(&self.regions, offset),
            None => Some(HTML),
        }
    }

    /// Split `range`, or the whole document when `None`, into consecutive
    /// ranges tagged with their owning language.
    pub fn language_ranges(&self, range: Option<Range>) -> Vec<LanguageRange> {
        let (start, end) = match range {
            Some(range) => (
                self.line_index.clamped_offset(range.start),
                self.line_index.clamped_offset(range.end),
            ),
            None => (0, self.line_index.len()),
        };
        ranges::language_ranges(&self.line_index, &self.regions, start, end)
    }

    /// Distinct languages present, always including the host markup.
    pub fn languages_in_document(&self) -> Vec<&'static str> {
        ranges::languages_in_document(&self.regions)
    }

    /// `mj-include` paths in document order, duplicates kept.
    pub fn imported_scripts(&self) -> &[String] {
        &self.imported_scripts
    }
}
