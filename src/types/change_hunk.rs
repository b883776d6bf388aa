use serde::{Deserialize, Serialize};

/// A single edit computed by the remote side against the pre-patch text.
///
/// Offsets and lengths are in bytes. Hunks never build the new text, they
/// only tell a cursor how far to move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeHunk {
    pub offset: usize,
    pub length: usize,
    pub inserted_text: String,
}

impl ChangeHunk {
    #[must_use]
    pub fn new(offset: usize, length: usize, inserted_text: impl Into<String>) -> Self {
        Self {
            offset,
            length,
            inserted_text: inserted_text.into(),
        }
    }

    /// Creates a pure insertion at `offset`.
    #[must_use]
    pub fn insert(offset: usize, text: impl Into<String>) -> Self { Self::new(offset, 0, text) }

    /// Creates a pure deletion of `length` bytes at `offset`.
    #[must_use]
    pub fn delete(offset: usize, length: usize) -> Self { Self::new(offset, length, "") }

    /// Moves `position` by this hunk's net length change if the hunk starts
    /// strictly before it. Never moves below zero.
    #[must_use]
    pub fn shift(&self, position: usize) -> usize {
        if self.offset >= position {
            return position;
        }

        let inserted = self.inserted_text.len();
        if inserted >= self.length {
            position.saturating_add(inserted - self.length)
        } else {
            position.saturating_sub(self.length - inserted)
        }
    }
}

/// An authoritative replacement for a buffer's whole text, together with the
/// hunks that describe how it differs from the previous version.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patch {
    pub new_text: String,

    #[serde(default)]
    pub hunks: Vec<ChangeHunk>,
}

impl Patch {
    #[must_use]
    pub fn new(new_text: impl Into<String>, hunks: Vec<ChangeHunk>) -> Self {
        Self {
            new_text: new_text.into(),
            hunks,
        }
    }
}
