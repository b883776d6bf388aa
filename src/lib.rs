pub mod config;
pub mod consts;
pub mod coordinates;
pub mod detector;
pub mod errors;
pub mod host;
pub mod outbox;
pub mod project;
pub mod protocol;
pub mod reconciler;
pub mod registry;
pub mod resolver;
pub mod session;
pub mod types;
pub mod view;

pub use coordinates::{LineEnding, line_column_to_offset, offset_to_line_column};
pub use errors::SyncError;
pub use host::Host;
pub use outbox::{Outbox, OutboxReceiver, SelectionBroadcast, outbox};
pub use protocol::RemoteMessage;
pub use reconciler::{apply_patch, remap_cursor, update_view};
pub use session::{Event, Session, SessionContext};
pub use types::{
    buffer_id::BufferId,
    change_hunk::{ChangeHunk, Patch},
    selection::{LineColumn, Selection},
    shared_buffer::SharedBuffer,
};
pub use view::{DocumentView, View};
