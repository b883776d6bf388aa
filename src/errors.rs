use std::path::PathBuf;

use log::{debug, warn};
use thiserror::Error;

use crate::types::buffer_id::BufferId;

/// Error type for everything that can go wrong while synchronising a single
/// buffer. None of these are fatal to a session: the caller logs them and
/// moves on to the next event.
#[derive(Error, Debug)]
pub enum SyncError {
    /// The registry has no buffer with the given id.
    #[error("No shared buffer with id {id}")]
    BufferNotFound { id: BufferId },

    /// The host has no such open document, or the document was closed since
    /// it was last resolved.
    #[error("Document '{document}' is not open")]
    DocumentNotFound { document: String },

    /// A file could not be written before opening it, or read while opening
    /// it.
    #[error("I/O failure on '{}'", .path.display())]
    IoFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A remote path that would resolve outside of the project root.
    #[error("Path '{path}' points outside of the project")]
    OutsideProject { path: String },

    /// A host editor primitive failed.
    #[error("Host error: {reason}")]
    Host { reason: String },

    /// An inbound message could not be decoded.
    #[error("Invalid message: {reason}")]
    InvalidMessage { reason: String },
}

impl SyncError {
    #[must_use]
    pub fn host(reason: impl Into<String>) -> Self {
        SyncError::Host {
            reason: reason.into(),
        }
    }

    /// `true` for the conditions that only mean "nothing to sync here".
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            SyncError::BufferNotFound { .. } | SyncError::DocumentNotFound { .. }
        )
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(e: serde_json::Error) -> Self {
        SyncError::InvalidMessage {
            reason: e.to_string(),
        }
    }
}

/// Logs an error that made a single buffer fail to sync. Missing buffers and
/// documents are expected during normal operation and only logged at debug
/// level.
pub fn log_skipped(context: &str, error: &SyncError) {
    if error.is_not_found() {
        debug!("{context}: {error}");
    } else {
        warn!("{context}: {error:?}");
    }
}
