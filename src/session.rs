//! The single control flow every event of a session goes through.
//!
//! Remote messages and host notifications are handled one at a time and in
//! order. A failure only ever affects the buffer it happened on: it is logged
//! and the next event is handled as usual.

use std::collections::HashMap;

use log::{debug, info};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::{
    config::session_config::SessionConfig,
    detector::ChangeDetector,
    errors::{SyncError, log_skipped},
    host::Host,
    outbox::{Outbox, SelectionBroadcast},
    project::ProjectRoot,
    protocol::RemoteMessage,
    reconciler,
    registry::BufferRegistry,
    resolver::ViewResolver,
    types::{buffer_id::BufferId, change_hunk::Patch, selection::Selection, shared_buffer::SharedBuffer},
    view::DocumentView,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event<D> {
    Remote(RemoteMessage),

    /// The host reports that the text of a document changed.
    BufferChanged(D),

    /// The host reports that the cursor or selection of a document moved.
    SelectionChanged { document: D, is_edit: bool },

    /// The transport's acknowledgement that `text` was uploaded as the new
    /// content of the buffer.
    LocalChangeAccepted { buffer_id: BufferId, text: String },
}

/// Session-wide state, created when joining and cleared when leaving.
#[derive(Debug)]
pub struct SessionContext {
    pub registry: BufferRegistry,
    pub project: ProjectRoot,
    pub outbox: Outbox,
}

impl SessionContext {
    #[must_use]
    pub fn new(project: ProjectRoot, outbox: Outbox) -> Self {
        Self {
            registry: BufferRegistry::new(),
            project,
            outbox,
        }
    }

    #[must_use]
    pub fn resolver(&self) -> ViewResolver<'_> { ViewResolver::new(&self.registry, &self.project) }

    #[must_use]
    pub fn detector(&self) -> ChangeDetector<'_> { ChangeDetector::new(self.resolver(), &self.outbox) }
}

#[derive(Debug)]
pub struct Session<H: Host> {
    host: H,
    context: SessionContext,
    config: SessionConfig,
    /// Patches held back while their document loads, merged in arrival order.
    pending: HashMap<BufferId, Patch>,
}

impl<H: Host> Session<H> {
    pub fn new(host: H, context: SessionContext, config: SessionConfig) -> Self {
        Self {
            host,
            context,
            config,
            pending: HashMap::new(),
        }
    }

    #[must_use]
    pub fn host(&self) -> &H { &self.host }

    pub fn host_mut(&mut self) -> &mut H { &mut self.host }

    #[must_use]
    pub fn context(&self) -> &SessionContext { &self.context }

    /// Handles events until every sender of `events` is dropped.
    pub async fn run(&mut self, mut events: UnboundedReceiver<Event<H::Document>>) {
        info!(
            "Session started with {} shared buffers",
            self.context.registry.len()
        );

        while let Some(event) = events.recv().await {
            self.dispatch(event);
        }

        info!("Every event source is gone, stopping the session");
    }

    /// Handles a single event. Errors are logged, never returned: a buffer
    /// that fails to sync must not stop the others.
    pub fn dispatch(&mut self, event: Event<H::Document>) {
        let subject = self.subject(&event);

        let result = match event {
            Event::Remote(message) => self.handle_remote(message),
            Event::BufferChanged(document) => self.buffer_changed(document).map(drop),
            Event::SelectionChanged { document, is_edit } => {
                self.selection_changed(document, is_edit).map(drop)
            }
            Event::LocalChangeAccepted { buffer_id, text } => {
                self.accept_local_change(&buffer_id, text)
            }
        };

        if let Err(error) = result {
            log_skipped(&format!("Skipping event for {subject}"), &error);
        }
    }

    pub fn handle_remote(&mut self, message: RemoteMessage) -> Result<(), SyncError> {
        match message {
            RemoteMessage::Announce(buffer) => self.announce(buffer),
            RemoteMessage::Patch {
                buffer_id,
                new_text,
                hunks,
            } => self.apply_patch(&buffer_id, &Patch::new(new_text, hunks)),
            RemoteMessage::Delete { buffer_id } => {
                self.delete(&buffer_id);
                Ok(())
            }
            RemoteMessage::Rename { buffer_id, path } => self.rename(&buffer_id, &path),
            RemoteMessage::Highlight {
                buffer_id,
                ranges,
                user_id,
                ping,
            } => self.highlight(&buffer_id, &ranges, &user_id, ping),
        }
    }

    /// Registers a buffer. An open document is refreshed with the announced
    /// content, otherwise the buffer is opened if the configuration asks for
    /// it.
    pub fn announce(&mut self, buffer: SharedBuffer) -> Result<(), SyncError> {
        info!("Buffer {} is shared at '{}'", buffer.id(), buffer.path());
        self.pending.remove(buffer.id());
        self.context.registry.put(buffer.clone());

        let resolver = self.context.resolver();
        if let Some(mut view) = resolver.resolve_view(&mut self.host, buffer.id()) {
            return reconciler::update_view(&mut view, buffer.content());
        }

        if !self.config.open_announced_buffers {
            debug!("Buffer {} is not open, not updating", buffer.id());
            return Ok(());
        }

        match resolver.create_view(&mut self.host, &buffer)? {
            Some(view) => debug!("Opened {view}"),
            None => debug!("View for buffer {} not found, not updating", buffer.id()),
        }

        Ok(())
    }

    /// Reconciles the open document of the buffer, if there is one, and
    /// stores the new text as the buffer's content.
    ///
    /// A document that is still loading is left alone and the patch is kept
    /// until the next notification for it, so the buffer's content never gets
    /// ahead of the document.
    pub fn apply_patch(&mut self, id: &BufferId, patch: &Patch) -> Result<(), SyncError> {
        if self.context.registry.get(id).is_none() {
            return Err(SyncError::BufferNotFound { id: id.clone() });
        }

        let patch = match self.pending.remove(id) {
            Some(mut pending) => {
                pending.new_text.clone_from(&patch.new_text);
                pending.hunks.extend(patch.hunks.iter().cloned());
                pending
            }
            None => patch.clone(),
        };

        let resolver = self.context.resolver();
        match resolver.resolve_view(&mut self.host, id) {
            Some(view) if view.is_loading() => {
                debug!("{view} is still loading, deferring the patch");
                self.pending.insert(id.clone(), patch);
                return Ok(());
            }
            Some(mut view) => {
                let cursor = reconciler::apply_patch(&mut view, &patch)?;
                debug!("Patched {view}, cursor is now at {cursor} bytes");
            }
            None => debug!("Buffer {id} is not open, only updating the buffer"),
        }

        self.context
            .registry
            .update_content(id, patch.new_text.as_str())
    }

    /// Stops tracking a buffer. The open document and the file on disk are
    /// left alone.
    pub fn delete(&mut self, id: &BufferId) {
        self.pending.remove(id);
        if self.context.registry.remove(id).is_some() {
            info!("Buffer {id} is no longer shared");
        }
    }

    pub fn rename(&mut self, id: &BufferId, path: &str) -> Result<(), SyncError> {
        let full_path = self.context.project.full_path(path)?;

        let resolver = self.context.resolver();
        if let Some(mut view) = resolver.resolve_view(&mut self.host, id) {
            view.rename(&full_path);
        }

        self.context.registry.rename(id, path)
    }

    pub fn highlight(
        &mut self,
        id: &BufferId,
        ranges: &[Selection],
        collaborator: &str,
        ping: bool,
    ) -> Result<(), SyncError> {
        let resolver = self.context.resolver();
        let Some(mut view) = resolver.resolve_view(&mut self.host, id) else {
            debug!("Buffer {id} is not open, not highlighting");
            return Ok(());
        };

        if ping {
            view.focus()?;
        }
        view.highlight(ranges, collaborator);

        Ok(())
    }

    pub fn buffer_changed(&mut self, document: H::Document) -> Result<Option<BufferId>, SyncError> {
        self.flush_pending(&document)?;
        self.context
            .detector()
            .buffer_changed(&mut self.host, document)
    }

    pub fn selection_changed(
        &mut self,
        document: H::Document,
        is_edit: bool,
    ) -> Result<Option<SelectionBroadcast>, SyncError> {
        self.flush_pending(&document)?;
        self.context
            .detector()
            .selection_changed(&mut self.host, document, is_edit)
    }

    /// Makes `text` the last known content of the buffer after the transport
    /// uploaded it.
    pub fn accept_local_change(&mut self, id: &BufferId, text: String) -> Result<(), SyncError> {
        debug!("Local change of buffer {id} was accepted");
        self.context.registry.update_content(id, text)
    }

    /// Forgets every buffer of the session.
    pub fn shutdown(&mut self) {
        info!(
            "Leaving the session, forgetting {} buffers",
            self.context.registry.len()
        );
        self.context.registry.clear();
        self.pending.clear();
    }

    /// Applies the patch held back for `document` once it finished loading.
    fn flush_pending(&mut self, document: &H::Document) -> Result<(), SyncError> {
        if self.pending.is_empty() {
            return Ok(());
        }

        let resolver = self.context.resolver();
        let Some(id) = resolver
            .get_buffer(&self.host, document)
            .map(|buffer| buffer.id().clone())
        else {
            return Ok(());
        };

        match self.pending.remove(&id) {
            Some(patch) => self.apply_patch(&id, &patch),
            None => Ok(()),
        }
    }

    fn subject(&self, event: &Event<H::Document>) -> String {
        let id = match event {
            Event::Remote(message) => message.buffer_id(),
            Event::LocalChangeAccepted { buffer_id, .. } => buffer_id,
            Event::BufferChanged(document) | Event::SelectionChanged { document, .. } => {
                return format!("document {document}");
            }
        };

        match self.context.registry.get(id) {
            Some(buffer) => format!("buffer {id} at '{}'", buffer.path()),
            None => format!("buffer {id}"),
        }
    }
}
