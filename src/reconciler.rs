//! Applies remote updates to a view.
//!
//! The remote side is the authority on a buffer's text, so a patch always
//! replaces the whole document with its `new_text`. The hunks are only used
//! to carry the local cursor along with the edits made before it, which
//! keeps the cursor in place relative to the surrounding text while
//! collaborators type.
//!
//! There is no merging: a local edit the remote side has not seen yet is
//! overwritten by the next patch for the same buffer, unless the
//! [`crate::detector`] already reported it upstream.

use log::debug;

use crate::{
    errors::SyncError,
    types::change_hunk::{ChangeHunk, Patch},
    view::DocumentView,
};

/// Replaces the view's text with `patch.new_text` and moves its cursor by
/// the net length of every hunk that starts before it. Returns the remapped
/// cursor offset.
///
/// Hunks are taken in the given order. They are expected to be sorted and
/// non-overlapping; when they are not, the cursor ends up approximately
/// right rather than the call failing.
pub fn apply_patch<V>(view: &mut V, patch: &Patch) -> Result<usize, SyncError>
where
    V: DocumentView + ?Sized,
{
    let cursor = view.cursor_offset()?;
    debug!("Cursor of {view} is at {cursor} bytes");

    view.set_text(&patch.new_text)?;

    let cursor = remap_cursor(cursor, &patch.hunks);
    view.set_cursor_offset(cursor)?;

    Ok(cursor)
}

/// Where a cursor at `cursor` ends up after `hunks` are applied in order.
#[must_use]
pub fn remap_cursor(cursor: usize, hunks: &[ChangeHunk]) -> usize {
    hunks.iter().fold(cursor, |cursor, hunk| hunk.shift(cursor))
}

/// Replaces the view's text without any hunks to go by, keeping the cursor
/// at the same byte offset. Used when a buffer's full content arrives again.
pub fn update_view<V>(view: &mut V, text: &str) -> Result<(), SyncError>
where
    V: DocumentView + ?Sized,
{
    if view.text()? == text {
        debug!("{view} is up to date");
        return Ok(());
    }

    debug!("Updating {view}");
    let cursor = view.cursor_offset()?;
    view.set_text(text)?;
    view.set_cursor_offset(cursor)
}
