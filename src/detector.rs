use log::debug;

use crate::{
    errors::SyncError,
    host::Host,
    outbox::{Outbox, SelectionBroadcast},
    resolver::ViewResolver,
    types::buffer_id::BufferId,
    view::{DocumentView, View},
};

/// Turns the host's change notifications into outbound events.
///
/// No diffing happens here: a buffer is queued whenever the document's text
/// differs from the last known content, and the transport works out what
/// changed against what it last sent.
#[derive(Debug, Clone, Copy)]
pub struct ChangeDetector<'a> {
    resolver: ViewResolver<'a>,
    outbox: &'a Outbox,
}

impl<'a> ChangeDetector<'a> {
    #[must_use]
    pub fn new(resolver: ViewResolver<'a>, outbox: &'a Outbox) -> Self { Self { resolver, outbox } }

    /// Queues the buffer behind `document` for upload if its text diverged.
    /// Every call that sees a divergence queues the id again.
    pub fn buffer_changed<H: Host>(
        &self,
        host: &mut H,
        document: H::Document,
    ) -> Result<Option<BufferId>, SyncError> {
        let Some(buffer) = self.resolver.get_buffer(host, &document) else {
            debug!(
                "Document {document} changed but it is not tracked, tracked buffers: [{}]",
                self.resolver.registry().summary()
            );
            return Ok(None);
        };

        let view = View::new(host, document, buffer);
        if view.text()? == buffer.content() {
            debug!("{view} has no local changes");
            return Ok(None);
        }

        debug!("{view} changed locally");
        self.outbox.push_change(buffer.id().clone());

        Ok(Some(buffer.id().clone()))
    }

    /// Queues the current selections of `document` for collaborators.
    pub fn selection_changed<H: Host>(
        &self,
        host: &mut H,
        document: H::Document,
        is_edit: bool,
    ) -> Result<Option<SelectionBroadcast>, SyncError> {
        let Some(buffer) = self.resolver.get_buffer(host, &document) else {
            return Ok(None);
        };

        let view = View::new(host, document, buffer);
        let broadcast = SelectionBroadcast {
            buffer_id: buffer.id().clone(),
            path: buffer.path().to_owned(),
            selections: view.selections()?,
            is_edit,
        };

        self.outbox.push_selection(broadcast.clone());
        Ok(Some(broadcast))
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        host::memory::MemoryHost,
        outbox::outbox,
        project::ProjectRoot,
        registry::BufferRegistry,
        types::{selection::{LineColumn, Selection}, shared_buffer::SharedBuffer},
    };

    fn setup() -> (ProjectRoot, BufferRegistry, MemoryHost) {
        let project = ProjectRoot::new("/project");
        let mut registry = BufferRegistry::new();
        registry.put(SharedBuffer::new(1, "a.txt", "X"));

        (project, registry, MemoryHost::default())
    }

    #[test]
    fn test_divergence_is_queued_every_time() {
        let (project, registry, mut host) = setup();
        let (outbox, mut receiver) = outbox();
        let document = host.open_with_text(Some(PathBuf::from("/project/a.txt")), "Y");
        let detector = ChangeDetector::new(ViewResolver::new(&registry, &project), &outbox);

        assert_eq!(
            detector.buffer_changed(&mut host, document).unwrap(),
            Some(BufferId::from(1))
        );
        assert_eq!(receiver.drain_changes(), vec![BufferId::from(1)]);

        detector.buffer_changed(&mut host, document).unwrap();
        detector.buffer_changed(&mut host, document).unwrap();
        assert_eq!(
            receiver.drain_changes(),
            vec![BufferId::from(1), BufferId::from(1)]
        );
    }

    #[test]
    fn test_unchanged_and_untracked_documents_are_ignored() {
        let (project, registry, mut host) = setup();
        let (outbox, mut receiver) = outbox();
        let unchanged = host.open_with_text(Some(PathBuf::from("/project/a.txt")), "X");
        let untracked = host.open_with_text(Some(PathBuf::from("/project/b.txt")), "Y");
        let unnamed = host.open_with_text(None, "Y");
        let detector = ChangeDetector::new(ViewResolver::new(&registry, &project), &outbox);

        for document in [unchanged, untracked, unnamed] {
            assert_eq!(detector.buffer_changed(&mut host, document).unwrap(), None);
        }

        assert!(receiver.drain_changes().is_empty());
    }

    #[test]
    fn test_selection_changed() {
        let (project, registry, mut host) = setup();
        let (outbox, mut receiver) = outbox();
        let document = host.open_with_text(Some(PathBuf::from("/project/a.txt")), "ab\ncd");
        host.set_cursor(&document, LineColumn::new(2, 2)).unwrap();
        let untracked = host.open_with_text(None, "");
        let detector = ChangeDetector::new(ViewResolver::new(&registry, &project), &outbox);

        detector.selection_changed(&mut host, document, true).unwrap();
        assert_eq!(
            detector.selection_changed(&mut host, untracked, false).unwrap(),
            None
        );

        assert_eq!(
            receiver.drain_selections(),
            vec![SelectionBroadcast {
                buffer_id: 1.into(),
                path: "a.txt".to_owned(),
                selections: vec![Selection::collapsed(4)],
                is_edit: true,
            }]
        );
    }

    #[test]
    fn test_closed_document_is_untracked() {
        let (project, registry, mut host) = setup();
        let (outbox, _receiver) = outbox();
        let document = host.open_with_text(Some(PathBuf::from("/project/a.txt")), "Y");
        host.close(document);
        let detector = ChangeDetector::new(ViewResolver::new(&registry, &project), &outbox);

        assert_eq!(detector.buffer_changed(&mut host, document).unwrap(), None);
    }
}
