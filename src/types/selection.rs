use serde::{Deserialize, Serialize};

/// `Selection` is a byte range in a document's text. A collapsed selection
/// (`start == end`) is a plain cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self { Self { start, end } }

    #[must_use]
    pub fn collapsed(offset: usize) -> Self { Self::new(offset, offset) }
}

/// A 1-indexed position in a document, the addressing most host editors use
/// for their native cursor primitives. Columns count bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LineColumn {
    pub line: usize,
    pub column: usize,
}

impl LineColumn {
    #[must_use]
    pub fn new(line: usize, column: usize) -> Self { Self { line, column } }
}

impl Default for LineColumn {
    fn default() -> Self { Self::new(1, 1) }
}
