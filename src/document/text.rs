//! Byte offset <-> LSP position conversion.
//!
//! Offsets are UTF-8 byte offsets into the document text; positions use
//! UTF-16 columns as LSP requires.

use tower_lsp::lsp_types::{Position, Range};

/// Line start table over a document's text.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Byte offset where each line starts.
    line_starts: Vec<usize>,
    text: String,
}

impl LineIndex {
    pub fn new(text: String) -> Self {
        let line_starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { line_starts, text }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length of the text in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Byte range of `line`, excluding its line terminator.
    fn line_bounds(&self, line: usize) -> (usize, usize) {
        let start = self.line_starts[line];
        let end = match self.line_starts.get(line + 1) {
            Some(&next) => {
                let without_lf = next - 1;
                if self.text.as_bytes().get(without_lf.wrapping_sub(1)) == Some(&b'\r')
                    && without_lf > start
                {
                    without_lf - 1
                } else {
                    without_lf
                }
            }
            None => self.text.len(),
        };
        (start, end)
    }

    /// Position of a byte offset. Offsets past the end map to the end of the text.
    pub fn offset_to_position(&self, offset: usize) -> Position {
        let offset = offset.min(self.text.len());
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(line) => line - 1,
        };
        let line_start = self.line_starts[line];
        let character: usize = self.text[line_start..]
            .char_indices()
            .take_while(|(i, _)| line_start + i < offset)
            .map(|(_, c)| c.len_utf16())
            .sum();
        Position::new(line as u32, character as u32)
    }

    /// Byte offset of a position, or `None` if its line does not exist.
    ///
    /// Columns past the end of the line map to the end of the line.
    pub fn position_to_offset(&self, position: Position) -> Option<usize> {
        let line = position.line as usize;
        if line >= self.line_starts.len() {
            return None;
        }
        let (line_start, line_end) = self.line_bounds(line);

        let mut column = 0u32;
        for (i, c) in self.text[line_start..line_end].char_indices() {
            if column >= position.character {
                return Some(line_start + i);
            }
            column += c.len_utf16() as u32;
        }
        Some(line_end)
    }

    /// Like [`position_to_offset`](Self::position_to_offset), but positions
    /// past the last line map to the end of the text.
    pub fn clamped_offset(&self, position: Position) -> usize {
        self.position_to_offset(position).unwrap_or(self.text.len())
    }

    pub fn span_to_range(&self, span: &std::ops::Range<usize>) -> Range {
        Range::new(
            self.offset_to_position(span.start),
            self.offset_to_position(span.end),
        )
    }
}
