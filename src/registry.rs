use std::{collections::HashMap, sync::Arc};

use log::debug;

use crate::{
    errors::SyncError,
    types::{buffer_id::BufferId, shared_buffer::SharedBuffer},
};

/// Last known authoritative state of every buffer in the session, keyed by
/// id. Paths are unique too and act as a secondary key.
#[derive(Debug, Clone, Default)]
pub struct BufferRegistry {
    buffers: HashMap<BufferId, SharedBuffer>,
}

impl BufferRegistry {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn get(&self, id: &BufferId) -> Option<&SharedBuffer> { self.buffers.get(id) }

    /// Inserts `buffer`, replacing the buffer with the same id. A different
    /// buffer registered under the same path is dropped to keep paths unique.
    /// Returns the replaced buffer with the same id, if any.
    pub fn put(&mut self, buffer: SharedBuffer) -> Option<SharedBuffer> {
        let stale = self
            .buffers
            .values()
            .find(|existing| existing.path() == buffer.path() && existing.id() != buffer.id())
            .map(|existing| existing.id().clone());

        if let Some(stale) = stale {
            debug!(
                "Buffer {stale} is replaced by buffer {} at '{}'",
                buffer.id(),
                buffer.path()
            );
            self.buffers.remove(&stale);
        }

        self.buffers.insert(buffer.id().clone(), buffer)
    }

    /// Stops tracking a buffer. Unknown ids are ignored.
    pub fn remove(&mut self, id: &BufferId) -> Option<SharedBuffer> {
        let removed = self.buffers.remove(id);
        if removed.is_none() {
            debug!("Buffer {id} is not tracked, nothing to remove");
        }
        removed
    }

    #[must_use]
    pub fn find_by_path(&self, path: &str) -> Option<&SharedBuffer> {
        self.buffers.values().find(|buffer| buffer.path() == path)
    }

    pub fn update_content(
        &mut self,
        id: &BufferId,
        content: impl Into<Arc<str>>,
    ) -> Result<(), SyncError> {
        self.buffers
            .get_mut(id)
            .ok_or_else(|| SyncError::BufferNotFound { id: id.clone() })?
            .set_content(content);
        Ok(())
    }

    pub fn rename(&mut self, id: &BufferId, path: &str) -> Result<(), SyncError> {
        let mut buffer = self
            .buffers
            .get(id)
            .cloned()
            .ok_or_else(|| SyncError::BufferNotFound { id: id.clone() })?;

        buffer.set_path(path);
        self.put(buffer);
        Ok(())
    }

    /// Ids of all tracked buffers in a stable order.
    #[must_use]
    pub fn ids(&self) -> Vec<BufferId> {
        let mut ids = self.buffers.keys().cloned().collect::<Vec<_>>();
        ids.sort();
        ids
    }

    pub fn iter(&self) -> impl Iterator<Item = &SharedBuffer> { self.buffers.values() }

    /// `id 'path'` of every tracked buffer ordered by id, for log messages.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut buffers = self.buffers.values().collect::<Vec<_>>();
        buffers.sort_by(|a, b| a.id().cmp(b.id()));

        buffers
            .iter()
            .map(|buffer| format!("{} '{}'", buffer.id(), buffer.path()))
            .collect::<Vec<_>>()
            .join(", ")
    }

    #[must_use]
    pub fn len(&self) -> usize { self.buffers.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.buffers.is_empty() }

    pub fn clear(&mut self) { self.buffers.clear(); }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_put_and_get() {
        let mut registry = BufferRegistry::new();

        assert_eq!(registry.put(SharedBuffer::new(1, "a.txt", "a")), None);
        assert_eq!(
            registry.put(SharedBuffer::new(1, "a.txt", "b")),
            Some(SharedBuffer::new(1, "a.txt", "a"))
        );

        assert_eq!(registry.get(&1.into()).unwrap().content(), "b");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut registry = BufferRegistry::new();
        registry.put(SharedBuffer::new(1, "a.txt", "a"));

        assert!(registry.remove(&1.into()).is_some());
        assert!(registry.remove(&1.into()).is_none());
        assert!(registry.remove(&"unknown".into()).is_none());
        assert!(registry.get(&1.into()).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_find_by_path() {
        let mut registry = BufferRegistry::new();
        registry.put(SharedBuffer::new(1, "a.txt", "a"));
        registry.put(SharedBuffer::new("two", "dir/b.txt", "b"));

        assert_eq!(
            registry.find_by_path("dir/b.txt").map(SharedBuffer::id),
            Some(&BufferId::from("two"))
        );
        assert!(registry.find_by_path("b.txt").is_none());
    }

    #[test]
    fn test_paths_stay_unique() {
        let mut registry = BufferRegistry::new();
        registry.put(SharedBuffer::new(1, "a.txt", "old"));
        registry.put(SharedBuffer::new(2, "a.txt", "new"));

        assert_eq!(registry.ids(), vec![BufferId::from(2)]);
        assert_eq!(registry.find_by_path("a.txt").unwrap().content(), "new");
    }

    #[test]
    fn test_update_content() {
        let mut registry = BufferRegistry::new();
        registry.put(SharedBuffer::new(1, "a.txt", "old"));

        registry.update_content(&1.into(), "new").unwrap();

        assert_eq!(registry.get(&1.into()).unwrap().content(), "new");
        assert!(matches!(
            registry.update_content(&2.into(), "x"),
            Err(SyncError::BufferNotFound { .. })
        ));
    }

    #[test]
    fn test_summary() {
        let mut registry = BufferRegistry::new();
        assert_eq!(registry.summary(), "");

        registry.put(SharedBuffer::new(2, "dir/b.txt", "b"));
        registry.put(SharedBuffer::new(1, "a.txt", "a"));

        insta::assert_snapshot!(registry.summary(), @"1 'a.txt', 2 'dir/b.txt'");
    }

    #[test]
    fn test_rename() {
        let mut registry = BufferRegistry::new();
        registry.put(SharedBuffer::new(1, "a.txt", "a"));

        registry.rename(&1.into(), "b.txt").unwrap();

        assert!(registry.find_by_path("a.txt").is_none());
        assert_eq!(registry.find_by_path("b.txt").unwrap().id(), &BufferId::from(1));
    }
}
