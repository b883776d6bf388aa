use serde::Serialize;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender, error::TryRecvError};

use crate::types::{buffer_id::BufferId, selection::Selection};

/// A local cursor or selection move to be shown to collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionBroadcast {
    pub buffer_id: BufferId,
    pub path: String,
    pub selections: Vec<Selection>,

    /// Whether the selection moved because of an edit rather than
    /// navigation.
    pub is_edit: bool,
}

/// Sending half of the outbound queues. The transport owns the matching
/// [`OutboxReceiver`] and drains it at its own pace.
#[derive(Debug, Clone)]
pub struct Outbox {
    changes: UnboundedSender<BufferId>,
    selections: UnboundedSender<SelectionBroadcast>,
}

#[derive(Debug)]
pub struct OutboxReceiver {
    /// Ids of buffers with local changes to upload. Not deduplicated.
    pub changes: UnboundedReceiver<BufferId>,
    pub selections: UnboundedReceiver<SelectionBroadcast>,
}

#[must_use]
pub fn outbox() -> (Outbox, OutboxReceiver) {
    let (changes_tx, changes_rx) = mpsc::unbounded_channel();
    let (selections_tx, selections_rx) = mpsc::unbounded_channel();

    (
        Outbox {
            changes: changes_tx,
            selections: selections_tx,
        },
        OutboxReceiver {
            changes: changes_rx,
            selections: selections_rx,
        },
    )
}

impl Outbox {
    /// Queues a buffer for upload. We ignore & log failures, they only happen
    /// once the transport is gone.
    pub fn push_change(&self, id: BufferId) {
        if let Err(error) = self.changes.send(id) {
            log::debug!("Failed to queue change of buffer {}: transport is gone", error.0);
        }
    }

    pub fn push_selection(&self, broadcast: SelectionBroadcast) {
        if let Err(error) = self.selections.send(broadcast) {
            log::debug!(
                "Failed to queue selection of buffer {}: transport is gone",
                error.0.buffer_id
            );
        }
    }
}

impl OutboxReceiver {
    /// Everything queued so far, without waiting for more.
    pub fn drain_changes(&mut self) -> Vec<BufferId> { drain(&mut self.changes) }

    pub fn drain_selections(&mut self) -> Vec<SelectionBroadcast> { drain(&mut self.selections) }
}

fn drain<T>(receiver: &mut UnboundedReceiver<T>) -> Vec<T> {
    let mut items = Vec::new();
    loop {
        match receiver.try_recv() {
            Ok(item) => items.push(item),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => return items,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_changes_are_kept_in_order_without_dedup() {
        let (outbox, mut receiver) = outbox();

        outbox.push_change(1.into());
        outbox.push_change("b".into());
        outbox.push_change(1.into());

        assert_eq!(
            receiver.drain_changes(),
            vec![BufferId::from(1), BufferId::from("b"), BufferId::from(1)]
        );
        assert!(receiver.drain_changes().is_empty());
    }

    #[test]
    fn test_pushing_after_receiver_is_dropped_is_ignored() {
        let (outbox, receiver) = outbox();
        drop(receiver);

        outbox.push_change(1.into());
        outbox.push_selection(SelectionBroadcast {
            buffer_id: 1.into(),
            path: "a.txt".to_owned(),
            selections: vec![],
            is_edit: false,
        });
    }

    #[test]
    fn test_selection_broadcast_serialization() {
        let broadcast = SelectionBroadcast {
            buffer_id: 4.into(),
            path: "a.txt".to_owned(),
            selections: vec![Selection::collapsed(3)],
            is_edit: true,
        };

        insta::assert_snapshot!(
            serde_json::to_string(&broadcast).unwrap(),
            @r#"{"bufferId":4,"path":"a.txt","selections":[{"start":3,"end":3}],"isEdit":true}"#
        );
    }
}
