//! Conversion between byte offsets into a document's text and the 1-indexed
//! line/column coordinates host editors address their cursors with.
//!
//! Everything here is plain byte arithmetic over the line lengths: the text
//! is never sliced at the converted offset, so an offset that falls inside a
//! multi-byte character converts (and converts back) without touching the
//! text itself.

use serde::{Deserialize, Serialize};

use crate::types::selection::LineColumn;

/// The line terminator a host joins its lines with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }

    /// Number of bytes the terminator takes up between two lines.
    #[must_use]
    pub fn width(self) -> usize { self.as_str().len() }

    /// Finds the line and column of the byte at `offset`. Offsets past the
    /// end of the text are treated as the end of the text.
    #[must_use]
    pub fn offset_to_line_column(self, text: &str, offset: usize) -> LineColumn {
        let offset = offset.min(text.len());
        let width = self.width();

        let mut line_start = 0;
        let mut line_index = 0;
        for (index, line) in text.split(self.as_str()).enumerate() {
            line_index = index;
            let next_line_start = line_start + line.len() + width;
            if next_line_start > offset {
                break;
            }
            line_start = next_line_start;
        }

        LineColumn::new(line_index + 1, offset - line_start + 1)
    }

    /// Inverse of [`LineEnding::offset_to_line_column`]. Lines past the end
    /// resolve to the last line, and columns are clamped to the line they
    /// address so that the result never exceeds the text's length.
    #[must_use]
    pub fn line_column_to_offset(self, text: &str, position: LineColumn) -> usize {
        let width = self.width();

        let mut line_start = 0;
        let mut lines = text.split(self.as_str()).enumerate().peekable();
        while let Some((index, line)) = lines.next() {
            if index + 1 >= position.line || lines.peek().is_none() {
                let column = position
                    .column
                    .saturating_sub(1)
                    .min(line.len() + width - 1);
                return (line_start + column).min(text.len());
            }
            line_start += line.len() + width;
        }

        text.len()
    }

    /// Clamps `offset` to a position a cursor can actually occupy: inside the
    /// text, on a character boundary and never between the two bytes of a
    /// `\r\n` terminator. The latter resolves to the end of the line.
    #[must_use]
    pub fn clamp_offset(self, text: &str, offset: usize) -> usize {
        let offset = floor_char_boundary(text, offset);

        let inside_terminator = self == LineEnding::CrLf
            && text[..offset].ends_with('\r')
            && text[offset..].starts_with('\n');
        if inside_terminator {
            return offset - 1;
        }

        offset
    }
}

/// [`LineEnding::offset_to_line_column`] for `\n`-joined text.
#[must_use]
pub fn offset_to_line_column(text: &str, offset: usize) -> LineColumn {
    LineEnding::Lf.offset_to_line_column(text, offset)
}

/// [`LineEnding::line_column_to_offset`] for `\n`-joined text.
#[must_use]
pub fn line_column_to_offset(text: &str, position: LineColumn) -> usize {
    LineEnding::Lf.line_column_to_offset(text, position)
}

/// Clamps `offset` into the text and moves it back to the closest UTF-8
/// character boundary.
#[must_use]
pub fn floor_char_boundary(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}
