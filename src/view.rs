use std::{fmt::Display, path::Path};

use log::{debug, warn};

use crate::{
    errors::SyncError,
    host::Host,
    types::{
        buffer_id::BufferId,
        selection::Selection,
        shared_buffer::SharedBuffer,
    },
};

/// What the synchronisation logic needs from a document open in an editor.
///
/// All offsets are byte offsets into the text returned by [`DocumentView::text`].
/// A view that outlived its document fails with
/// [`SyncError::DocumentNotFound`] instead of acting on stale state.
pub trait DocumentView: Display {
    fn buffer_id(&self) -> &BufferId;

    /// Relative path of the bound buffer.
    fn path(&self) -> &str;

    fn text(&self) -> Result<String, SyncError>;

    /// Replaces the whole text as a single edit. Never moves the cursor.
    fn set_text(&mut self, text: &str) -> Result<(), SyncError>;

    fn cursor_offset(&self) -> Result<usize, SyncError>;

    /// Moves the cursor, clamping offsets that fall outside of the text or
    /// inside a multi-byte character.
    fn set_cursor_offset(&mut self, offset: usize) -> Result<(), SyncError>;

    /// Only the primary cursor is tracked, so this is always a single
    /// collapsed selection.
    fn selections(&self) -> Result<Vec<Selection>, SyncError> {
        Ok(vec![Selection::collapsed(self.cursor_offset()?)])
    }

    /// Brings the document to the foreground.
    fn focus(&mut self) -> Result<(), SyncError>;

    /// Shows a collaborator's ranges. Best effort: failures are only logged.
    fn highlight(&mut self, ranges: &[Selection], collaborator: &str);

    /// Best effort.
    fn rename(&mut self, path: &Path);

    /// Best effort.
    fn clear_selections(&mut self);

    fn is_loading(&self) -> bool { false }
}

/// The binding of a shared buffer to a document of a [`Host`].
///
/// Views borrow the host, so they only live for the duration of one
/// operation and are resolved again for the next one.
#[derive(Debug)]
pub struct View<'h, H: Host> {
    host: &'h mut H,
    document: H::Document,
    buffer_id: BufferId,
    path: String,
}

impl<'h, H: Host> View<'h, H> {
    pub fn new(host: &'h mut H, document: H::Document, buffer: &SharedBuffer) -> Self {
        Self {
            host,
            document,
            buffer_id: buffer.id().clone(),
            path: buffer.path().to_owned(),
        }
    }

    #[must_use]
    pub fn document(&self) -> &H::Document { &self.document }
}

impl<H: Host> Display for View<'_, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.document, self.buffer_id, self.path)
    }
}

impl<H: Host> DocumentView for View<'_, H> {
    fn buffer_id(&self) -> &BufferId { &self.buffer_id }

    fn path(&self) -> &str { &self.path }

    fn text(&self) -> Result<String, SyncError> { self.host.text(&self.document) }

    fn set_text(&mut self, text: &str) -> Result<(), SyncError> {
        self.host.set_text(&self.document, text)
    }

    fn cursor_offset(&self) -> Result<usize, SyncError> {
        let text = self.text()?;
        let position = self.host.cursor(&self.document)?;

        Ok(self.host.line_ending().line_column_to_offset(&text, position))
    }

    fn set_cursor_offset(&mut self, offset: usize) -> Result<(), SyncError> {
        let text = self.text()?;
        let line_ending = self.host.line_ending();
        let offset = line_ending.clamp_offset(&text, offset);
        let position = line_ending.offset_to_line_column(&text, offset);

        debug!("Setting cursor of {self} to {position:?}");
        self.host.set_cursor(&self.document, position)
    }

    fn focus(&mut self) -> Result<(), SyncError> {
        self.host.bring_to_front(&self.document)?;
        self.host.detect_content_type(&self.document)
    }

    fn highlight(&mut self, ranges: &[Selection], collaborator: &str) {
        debug!("Highlighting ranges {ranges:?} of {collaborator} in {self}");
        if let Err(error) = self.host.highlight(&self.document, ranges, collaborator) {
            warn!("Cannot highlight ranges in {self}: {error}");
        }
    }

    fn rename(&mut self, path: &Path) {
        debug!("Renaming {self} to '{}'", path.display());
        if let Err(error) = self.host.rename(&self.document, path) {
            warn!("Cannot rename {self}: {error}");
        }
    }

    fn clear_selections(&mut self) {
        debug!("Clearing selections of {self}");
        if let Err(error) = self.host.clear_selections(&self.document) {
            warn!("Cannot clear selections of {self}: {error}");
        }
    }

    fn is_loading(&self) -> bool { self.host.is_loading(&self.document) }
}
