use std::{fs, path::PathBuf};

use log::{debug, warn};

use crate::{
    errors::SyncError,
    host::Host,
    project::ProjectRoot,
    registry::BufferRegistry,
    types::{buffer_id::BufferId, shared_buffer::SharedBuffer},
    view::View,
};

/// Maps between shared buffers and the host's open documents. Nothing is
/// cached: every call asks the host again, so documents closed in the
/// meantime are never acted on.
#[derive(Debug, Clone, Copy)]
pub struct ViewResolver<'a> {
    registry: &'a BufferRegistry,
    project: &'a ProjectRoot,
}

impl<'a> ViewResolver<'a> {
    #[must_use]
    pub fn new(registry: &'a BufferRegistry, project: &'a ProjectRoot) -> Self {
        Self { registry, project }
    }

    #[must_use]
    pub fn registry(&self) -> &'a BufferRegistry { self.registry }

    /// Finds the open document of the buffer with `id`. `None` if the buffer
    /// is unknown or not open; whether to open it is up to the caller.
    pub fn resolve_view<'h, H: Host>(&self, host: &'h mut H, id: &BufferId) -> Option<View<'h, H>> {
        let buffer = self.registry.get(id)?;
        let document = self.find_document(host, buffer.path())?;

        Some(View::new(host, document, buffer))
    }

    /// Writes the buffer to disk and opens it in the host. Returns `None`
    /// when the host could not open the file.
    ///
    /// The content has to hit the disk first because hosts open files, not
    /// strings.
    pub fn create_view<'h, H: Host>(
        &self,
        host: &'h mut H,
        buffer: &SharedBuffer,
    ) -> Result<Option<View<'h, H>>, SyncError> {
        let path = self.save_buffer(buffer)?;

        if let Some(document) = self.find_document(host, buffer.path()) {
            return Ok(Some(View::new(host, document, buffer)));
        }

        if let Err(error) = host.open(&path) {
            warn!("Cannot open '{}': {error}", path.display());
            return Ok(None);
        }

        match self.find_document(host, buffer.path()) {
            Some(document) => Ok(Some(View::new(host, document, buffer))),
            None => {
                warn!(
                    "Document is missing even though we tried to open it: {}",
                    path.display()
                );
                Ok(None)
            }
        }
    }

    /// The shared buffer behind a host document. `None` for unnamed
    /// documents, files outside of the project and files nobody shared.
    pub fn get_buffer<H: Host>(&self, host: &H, document: &H::Document) -> Option<&'a SharedBuffer> {
        let Some(path) = host.path(document) else {
            debug!("get_buffer: document {document} has no file name");
            return None;
        };

        let Some(relative_path) = self.project.relative_path(&path) else {
            debug!("get_buffer: '{}' is not shared", path.display());
            return None;
        };

        let buffer = self.registry.find_by_path(&relative_path);
        if buffer.is_none() {
            debug!("get_buffer: no buffer has path '{relative_path}'");
        }

        buffer
    }

    /// Materializes the buffer's content at its path under the project root.
    pub fn save_buffer(&self, buffer: &SharedBuffer) -> Result<PathBuf, SyncError> {
        let path = self.project.full_path(buffer.path())?;

        if let Some(directory) = path.parent() {
            fs::create_dir_all(directory).map_err(|source| SyncError::IoFailure {
                path: directory.to_path_buf(),
                source,
            })?;
        }

        fs::write(&path, buffer.content()).map_err(|source| SyncError::IoFailure {
            path: path.clone(),
            source,
        })?;

        debug!("Saved buffer {} to '{}'", buffer.id(), path.display());
        Ok(path)
    }

    fn find_document<H: Host>(&self, host: &H, path: &str) -> Option<H::Document> {
        host.documents().into_iter().find(|document| {
            host.path(document)
                .and_then(|full_path| self.project.relative_path(&full_path))
                .is_some_and(|relative_path| relative_path == path)
        })
    }
}
