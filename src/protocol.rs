use serde::{Deserialize, Serialize};

use crate::{
    errors::SyncError,
    types::{
        buffer_id::BufferId,
        change_hunk::ChangeHunk,
        selection::Selection,
        shared_buffer::SharedBuffer,
    },
};

/// Messages the transport hands over from the remote session, tagged by
/// `name` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum RemoteMessage {
    /// A buffer joined the session or its full content was re-sent.
    #[serde(rename = "create_buf")]
    Announce(SharedBuffer),

    /// The authoritative new text of a buffer and the hunks that led to it.
    Patch {
        buffer_id: BufferId,
        new_text: String,
        #[serde(default)]
        hunks: Vec<ChangeHunk>,
    },

    #[serde(rename = "delete_buf")]
    Delete { buffer_id: BufferId },

    #[serde(rename = "rename_buf")]
    Rename { buffer_id: BufferId, path: String },

    /// A collaborator's selections. `ping` asks for the buffer to be brought
    /// to the front as well.
    Highlight {
        buffer_id: BufferId,
        ranges: Vec<Selection>,
        user_id: String,
        #[serde(default)]
        ping: bool,
    },
}

impl RemoteMessage {
    pub fn from_json(json: &str) -> Result<Self, SyncError> { Ok(serde_json::from_str(json)?) }

    #[must_use]
    pub fn buffer_id(&self) -> &BufferId {
        match self {
            RemoteMessage::Announce(buffer) => buffer.id(),
            RemoteMessage::Patch { buffer_id, .. }
            | RemoteMessage::Delete { buffer_id }
            | RemoteMessage::Rename { buffer_id, .. }
            | RemoteMessage::Highlight { buffer_id, .. } => buffer_id,
        }
    }
}
