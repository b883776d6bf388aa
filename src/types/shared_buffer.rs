use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::types::buffer_id::BufferId;

/// The remotely authoritative record of a collaboratively edited file: its
/// identity, its path relative to the project root and the last known
/// content.
///
/// The content is an immutable snapshot. Clones share it, and replacing it
/// swaps the whole `Arc`, so older clones keep the text they were made with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedBuffer {
    id: BufferId,
    path: String,

    #[serde(rename = "buf")]
    content: Arc<str>,
}

impl SharedBuffer {
    #[must_use]
    pub fn new(id: impl Into<BufferId>, path: impl Into<String>, content: impl Into<Arc<str>>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
            content: content.into(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &BufferId { &self.id }

    /// Relative, `/`-separated path of the buffer inside the project.
    #[must_use]
    pub fn path(&self) -> &str { &self.path }

    #[must_use]
    pub fn content(&self) -> &str { &self.content }

    pub fn set_content(&mut self, content: impl Into<Arc<str>>) { self.content = content.into(); }

    pub fn set_path(&mut self, path: impl Into<String>) { self.path = path.into(); }
}
