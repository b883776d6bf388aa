//! An editor that only exists in memory. It opens files from disk like a real
//! editor would, which makes it a faithful stand-in for tests and for
//! replaying recorded sessions.

use std::{
    collections::BTreeMap,
    fmt::Display,
    fs,
    path::{Path, PathBuf},
};

use log::debug;

use crate::{
    coordinates::LineEnding,
    errors::SyncError,
    host::Host,
    types::selection::{LineColumn, Selection},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(u64);

impl Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.0) }
}

/// A collaborator's ranges as last rendered by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlight {
    pub ranges: Vec<Selection>,
    pub collaborator: String,
}

#[derive(Debug, Clone)]
struct MemoryDocument {
    path: Option<PathBuf>,
    lines: Vec<String>,
    cursor: LineColumn,
    highlights: Vec<Highlight>,
    content_type_detections: usize,
    loading: bool,
}

#[derive(Debug, Default)]
pub struct MemoryHost {
    documents: BTreeMap<DocumentId, MemoryDocument>,
    next_id: u64,
    focused: Option<DocumentId>,
    line_ending: LineEnding,
}

impl MemoryHost {
    #[must_use]
    pub fn new(line_ending: LineEnding) -> Self {
        Self {
            line_ending,
            ..Self::default()
        }
    }

    /// Opens a document with the given content without touching the disk, the
    /// way a user would open a scratch buffer or a file the host already had
    /// loaded.
    pub fn open_with_text(&mut self, path: Option<PathBuf>, text: &str) -> DocumentId {
        self.next_id += 1;
        let id = DocumentId(self.next_id);
        let lines = self.split_lines(text);

        self.documents.insert(
            id,
            MemoryDocument {
                path,
                lines,
                cursor: LineColumn::default(),
                highlights: Vec::new(),
                content_type_detections: 0,
                loading: false,
            },
        );

        id
    }

    pub fn close(&mut self, document: DocumentId) -> bool {
        if self.focused == Some(document) {
            self.focused = None;
        }

        self.documents.remove(&document).is_some()
    }

    #[must_use]
    pub fn find(&self, path: &Path) -> Option<DocumentId> {
        self.documents
            .iter()
            .find(|(_, document)| document.path.as_deref() == Some(path))
            .map(|(id, _)| *id)
    }

    #[must_use]
    pub fn focused(&self) -> Option<DocumentId> { self.focused }

    pub fn highlights(&self, document: DocumentId) -> Result<&[Highlight], SyncError> {
        Ok(&self.get(document)?.highlights)
    }

    pub fn content_type_detections(&self, document: DocumentId) -> Result<usize, SyncError> {
        Ok(self.get(document)?.content_type_detections)
    }

    pub fn set_loading(&mut self, document: DocumentId, loading: bool) -> Result<(), SyncError> {
        self.get_mut(document)?.loading = loading;
        Ok(())
    }

    fn split_lines(&self, text: &str) -> Vec<String> {
        text.split(self.line_ending.as_str())
            .map(ToOwned::to_owned)
            .collect()
    }

    fn get(&self, document: DocumentId) -> Result<&MemoryDocument, SyncError> {
        self.documents
            .get(&document)
            .ok_or_else(|| SyncError::DocumentNotFound {
                document: document.to_string(),
            })
    }

    fn get_mut(&mut self, document: DocumentId) -> Result<&mut MemoryDocument, SyncError> {
        self.documents
            .get_mut(&document)
            .ok_or_else(|| SyncError::DocumentNotFound {
                document: document.to_string(),
            })
    }
}

impl Host for MemoryHost {
    type Document = DocumentId;

    fn documents(&self) -> Vec<DocumentId> { self.documents.keys().copied().collect() }

    fn path(&self, document: &DocumentId) -> Option<PathBuf> {
        self.documents
            .get(document)
            .and_then(|document| document.path.clone())
    }

    fn open(&mut self, path: &Path) -> Result<(), SyncError> {
        let text = fs::read_to_string(path).map_err(|source| SyncError::IoFailure {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(existing) = self.find(path) {
            debug!("Reloading document {existing} from '{}'", path.display());
            let lines = self.split_lines(&text);
            self.get_mut(existing)?.lines = lines;
        } else {
            let opened = self.open_with_text(Some(path.to_path_buf()), &text);
            debug!("Opened '{}' as document {opened}", path.display());
        }

        Ok(())
    }

    fn text(&self, document: &DocumentId) -> Result<String, SyncError> {
        Ok(self.get(*document)?.lines.join(self.line_ending.as_str()))
    }

    fn set_text(&mut self, document: &DocumentId, text: &str) -> Result<(), SyncError> {
        let lines = self.split_lines(text);
        self.get_mut(*document)?.lines = lines;
        Ok(())
    }

    fn cursor(&self, document: &DocumentId) -> Result<LineColumn, SyncError> {
        Ok(self.get(*document)?.cursor)
    }

    fn set_cursor(&mut self, document: &DocumentId, position: LineColumn) -> Result<(), SyncError> {
        if position.line == 0 || position.column == 0 {
            return Err(SyncError::host(format!(
                "Cursor position {position:?} is not 1-indexed"
            )));
        }

        self.get_mut(*document)?.cursor = position;
        Ok(())
    }

    fn bring_to_front(&mut self, document: &DocumentId) -> Result<(), SyncError> {
        self.get(*document)?;
        self.focused = Some(*document);
        Ok(())
    }

    fn detect_content_type(&mut self, document: &DocumentId) -> Result<(), SyncError> {
        self.get_mut(*document)?.content_type_detections += 1;
        Ok(())
    }

    fn highlight(
        &mut self,
        document: &DocumentId,
        ranges: &[Selection],
        collaborator: &str,
    ) -> Result<(), SyncError> {
        self.get_mut(*document)?.highlights.push(Highlight {
            ranges: ranges.to_vec(),
            collaborator: collaborator.to_owned(),
        });
        Ok(())
    }

    fn rename(&mut self, document: &DocumentId, path: &Path) -> Result<(), SyncError> {
        self.get_mut(*document)?.path = Some(path.to_path_buf());
        Ok(())
    }

    fn clear_selections(&mut self, document: &DocumentId) -> Result<(), SyncError> {
        self.get_mut(*document)?.highlights.clear();
        Ok(())
    }

    fn is_loading(&self, document: &DocumentId) -> bool {
        self.documents
            .get(document)
            .is_some_and(|document| document.loading)
    }

    fn line_ending(&self) -> LineEnding { self.line_ending }
}
