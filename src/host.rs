//! The capability set a host editor has to provide for its documents to take
//! part in a session.
//!
//! Hosts only expose native primitives (lines, line/column cursors, commands).
//! Byte offsets and the reconciliation logic on top of them live in
//! [`crate::view::View`], so every host gets the same behaviour.

pub mod memory;

use std::{
    fmt::{Debug, Display},
    path::{Path, PathBuf},
};

use crate::{
    coordinates::LineEnding,
    errors::SyncError,
    types::selection::{LineColumn, Selection},
};

pub trait Host {
    /// Opaque, host-owned handle of an open document.
    type Document: Clone + PartialEq + Debug + Display;

    /// All documents currently open in the editor.
    fn documents(&self) -> Vec<Self::Document>;

    /// Absolute path of the file backing `document`, `None` for unnamed
    /// documents.
    fn path(&self, document: &Self::Document) -> Option<PathBuf>;

    /// Opens the file at `path` as a document, reloading it from disk if it
    /// is already open.
    fn open(&mut self, path: &Path) -> Result<(), SyncError>;

    fn text(&self, document: &Self::Document) -> Result<String, SyncError>;

    /// Replaces the whole content of `document` as a single edit without
    /// moving its cursor.
    fn set_text(&mut self, document: &Self::Document, text: &str) -> Result<(), SyncError>;

    fn cursor(&self, document: &Self::Document) -> Result<LineColumn, SyncError>;

    fn set_cursor(&mut self, document: &Self::Document, position: LineColumn)
    -> Result<(), SyncError>;

    fn bring_to_front(&mut self, document: &Self::Document) -> Result<(), SyncError>;

    /// Re-runs file type detection, which replacing the content or reloading
    /// the file may have reset.
    fn detect_content_type(&mut self, document: &Self::Document) -> Result<(), SyncError>;

    fn highlight(
        &mut self,
        document: &Self::Document,
        ranges: &[Selection],
        collaborator: &str,
    ) -> Result<(), SyncError>;

    fn rename(&mut self, document: &Self::Document, path: &Path) -> Result<(), SyncError>;

    fn clear_selections(&mut self, document: &Self::Document) -> Result<(), SyncError>;

    /// Whether the host is still materializing `document`. Hosts that open
    /// documents synchronously never are.
    fn is_loading(&self, _document: &Self::Document) -> bool { false }

    fn line_ending(&self) -> LineEnding { LineEnding::Lf }
}
