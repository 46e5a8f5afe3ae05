//! Language ownership queries over a region index.
//!
//! Every query walks the regions in ascending order and stops as soon as a
//! region starts past the point of interest.

use tower_lsp::lsp_types::{Position, Range};

use crate::document::LineIndex;

use super::region::EmbeddedRegion;
use super::HTML;

/// A span of the document owned by one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageRange {
    pub range: Range,
    /// `None` for regions without a language, such as non-executable scripts.
    pub language_id: Option<&'static str>,
    /// Set for embedded regions, `None` for host markup.
    pub attribute_value: Option<bool>,
}

impl LanguageRange {
    fn host(start: Position, end: Position) -> Self {
        Self {
            range: Range::new(start, end),
            language_id: Some(HTML),
            attribute_value: None,
        }
    }
}

pub(crate) fn language_at_offset(
    regions: &[EmbeddedRegion],
    offset: usize,
) -> Option<&'static str> {
    for region in regions {
        if region.start > offset {
            break;
        }
        if region.contains(offset) {
            return region.language_id;
        }
    }
    Some(HTML)
}

/// Partition `[start, end)` into consecutive language ranges.
pub(crate) fn language_ranges(
    line_index: &LineIndex,
    regions: &[EmbeddedRegion],
    start: usize,
    end: usize,
) -> Vec<LanguageRange> {
    let mut result = Vec::new();
    let mut current_offset = start;
    let mut current_pos = line_index.offset_to_position(start);

    for region in regions {
        if region.start >= end {
            break;
        }
        if region.end <= current_offset || region.start == region.end {
            continue;
        }

        let start_pos = if current_offset < region.start {
            let pos = line_index.offset_to_position(region.start);
            result.push(LanguageRange::host(current_pos, pos));
            pos
        } else {
            current_pos
        };

        let region_end = region.end.min(end);
        let end_pos = line_index.offset_to_position(region_end);
        result.push(LanguageRange {
            range: Range::new(start_pos, end_pos),
            language_id: region.language_id,
            attribute_value: Some(region.attribute_value),
        });
        current_offset = region_end;
        current_pos = end_pos;
    }

    if current_offset < end {
        result.push(LanguageRange::host(
            current_pos,
            line_index.offset_to_position(end),
        ));
    }
    result
}

/// Distinct languages in first-seen order, always ending with the host
/// language unless a region already named it.
pub(crate) fn languages_in_document(regions: &[EmbeddedRegion]) -> Vec<&'static str> {
    let mut languages = Vec::new();
    for language_id in regions.iter().filter_map(|region| region.language_id) {
        if !languages.contains(&language_id) {
            languages.push(language_id);
        }
    }
    if !languages.contains(&HTML) {
        languages.push(HTML);
    }
    languages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedded::{CSS, JAVASCRIPT};

    fn region(language_id: Option<&'static str>, start: usize, end: usize) -> EmbeddedRegion {
        EmbeddedRegion {
            language_id,
            start,
            end,
            only_placeholders: false,
            attribute_value: false,
            attribute_name: None,
        }
    }

    fn spans(ranges: &[LanguageRange]) -> Vec<(u32, u32, Option<&'static str>)> {
        ranges
            .iter()
            .map(|r| (r.range.start.character, r.range.end.character, r.language_id))
            .collect()
    }

    #[test]
    fn offset_lookup_uses_inclusive_ends() {
        let regions = [region(Some(CSS), 5, 10), region(None, 10, 12)];
        assert_eq!(language_at_offset(&regions, 4), Some(HTML));
        assert_eq!(language_at_offset(&regions, 5), Some(CSS));
        // A shared boundary belongs to the first region.
        assert_eq!(language_at_offset(&regions, 10), Some(CSS));
        assert_eq!(language_at_offset(&regions, 11), None);
        assert_eq!(language_at_offset(&regions, 13), Some(HTML));
        assert_eq!(language_at_offset(&[], 0), Some(HTML));
    }

    #[test]
    fn partitions_whole_line() {
        let index = LineIndex::new("0123456789abcdef".to_string());
        let regions = [region(Some(CSS), 2, 4), region(Some(JAVASCRIPT), 4, 8)];
        let ranges = language_ranges(&index, &regions, 0, 16);
        assert_eq!(
            spans(&ranges),
            vec![
                (0, 2, Some(HTML)),
                (2, 4, Some(CSS)),
                (4, 8, Some(JAVASCRIPT)),
                (8, 16, Some(HTML)),
            ]
        );
    }

    #[test]
    fn clips_regions_to_query() {
        let index = LineIndex::new("0123456789abcdef".to_string());
        let regions = [region(Some(CSS), 2, 6), region(Some(CSS), 10, 14)];
        let ranges = language_ranges(&index, &regions, 4, 12);
        assert_eq!(
            spans(&ranges),
            vec![(4, 6, Some(CSS)), (6, 10, Some(HTML)), (10, 12, Some(CSS))]
        );
    }

    #[test]
    fn empty_regions_produce_no_ranges() {
        let index = LineIndex::new("<p style=\"\">".to_string());
        let regions = [region(Some(CSS), 10, 10)];
        let ranges = language_ranges(&index, &regions, 0, 12);
        assert_eq!(spans(&ranges), vec![(0, 12, Some(HTML))]);
    }

    #[test]
    fn empty_query_produces_nothing() {
        let index = LineIndex::new("abc".to_string());
        assert!(language_ranges(&index, &[], 2, 2).is_empty());
    }

    #[test]
    fn languages_are_deduplicated_in_order() {
        let regions = [
            region(Some(JAVASCRIPT), 0, 1),
            region(None, 1, 2),
            region(Some(CSS), 2, 3),
            region(Some(JAVASCRIPT), 3, 4),
        ];
        assert_eq!(languages_in_document(&regions), vec![JAVASCRIPT, CSS, HTML]);
        assert_eq!(languages_in_document(&[]), vec![HTML]);
    }
}
