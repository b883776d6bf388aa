use std::fs;

use buffer_sync::{
    BufferId, ChangeHunk, DocumentView, Event, Host, LineColumn, Patch, RemoteMessage, Session,
    SessionContext, SharedBuffer, apply_patch,
    config::session_config::SessionConfig,
    host::memory::MemoryHost,
    outbox,
    project::ProjectRoot,
};
use pretty_assertions::assert_eq;
use tokio::sync::mpsc;

#[test]
fn test_create_view_then_reconcile() {
    let directory = tempfile::tempdir().unwrap();
    let (outbox, _receiver) = outbox();
    let mut context = SessionContext::new(ProjectRoot::new(directory.path()), outbox);
    let mut host = MemoryHost::default();

    let buffer = SharedBuffer::new(1, "a.txt", "hello");
    context.registry.put(buffer.clone());

    let mut view = context
        .resolver()
        .create_view(&mut host, &buffer)
        .unwrap()
        .unwrap();
    assert_eq!(
        fs::read_to_string(directory.path().join("a.txt")).unwrap(),
        "hello"
    );
    assert_eq!(view.cursor_offset().unwrap(), 0);

    let cursor = apply_patch(
        &mut view,
        &Patch::new("hullo", vec![ChangeHunk::new(1, 1, "u")]),
    )
    .unwrap();

    assert_eq!(cursor, 0);
    assert_eq!(view.text().unwrap(), "hullo");
}

#[test]
fn test_local_change_is_queued_once_per_notification() {
    let directory = tempfile::tempdir().unwrap();
    let (outbox, mut receiver) = outbox();
    let context = SessionContext::new(ProjectRoot::new(directory.path()), outbox);
    let mut session = Session::new(MemoryHost::default(), context, SessionConfig::default());

    session
        .announce(SharedBuffer::new(1, "a.txt", "X"))
        .unwrap();
    let document = session
        .host()
        .find(&directory.path().join("a.txt"))
        .unwrap();
    session.host_mut().set_text(&document, "Y").unwrap();

    session.dispatch(Event::BufferChanged(document));
    assert_eq!(receiver.drain_changes(), vec![BufferId::from(1)]);

    session.dispatch(Event::BufferChanged(document));
    session.dispatch(Event::BufferChanged(document));
    assert_eq!(
        receiver.drain_changes(),
        vec![BufferId::from(1), BufferId::from(1)]
    );
}

#[test]
fn test_closed_document_is_reopened_by_announcement() {
    let directory = tempfile::tempdir().unwrap();
    let (outbox, _receiver) = outbox();
    let context = SessionContext::new(ProjectRoot::new(directory.path()), outbox);
    let mut session = Session::new(MemoryHost::default(), context, SessionConfig::default());
    let path = directory.path().join("notes/todo.md");

    session
        .announce(SharedBuffer::new("todo", "notes/todo.md", "- milk"))
        .unwrap();
    let document = session.host().find(&path).unwrap();
    session.host_mut().close(document);

    session
        .announce(SharedBuffer::new("todo", "notes/todo.md", "- milk\n- eggs"))
        .unwrap();

    let document = session.host().find(&path).unwrap();
    assert_eq!(session.host().text(&document).unwrap(), "- milk\n- eggs");
}

#[tokio::test]
async fn test_run_handles_events_in_order() {
    let directory = tempfile::tempdir().unwrap();
    let (outbox, mut receiver) = outbox();
    let context = SessionContext::new(ProjectRoot::new(directory.path()), outbox);
    let mut session = Session::new(MemoryHost::default(), context, SessionConfig::default());
    let (events, inbox) = mpsc::unbounded_channel();

    for json in [
        r#"{"name": "create_buf", "id": 1, "path": "a.txt", "buf": "one\ntwo"}"#,
        r#"{"name": "patch", "bufferId": 7, "newText": "unknown buffers are skipped"}"#,
        r#"{"name": "patch", "bufferId": 1, "newText": "zero\none\ntwo",
            "hunks": [{"offset": 0, "length": 0, "insertedText": "zero\n"}]}"#,
        r#"{"name": "highlight", "bufferId": 1, "ranges": [{"start": 0, "end": 4}],
            "userId": "alice", "ping": true}"#,
    ] {
        events
            .send(Event::Remote(RemoteMessage::from_json(json).unwrap()))
            .unwrap();
    }
    drop(events);

    session.run(inbox).await;

    let document = session
        .host()
        .find(&directory.path().join("a.txt"))
        .unwrap();
    let host = session.host();
    assert_eq!(host.text(&document).unwrap(), "zero\none\ntwo");
    assert_eq!(host.cursor(&document).unwrap(), LineColumn::new(1, 1));
    assert_eq!(host.focused(), Some(document));
    assert_eq!(host.highlights(document).unwrap()[0].collaborator, "alice");

    assert_eq!(
        session.context().registry.ids(),
        vec![BufferId::from(1)]
    );
    assert!(receiver.drain_changes().is_empty());
}

#[tokio::test]
async fn test_run_reports_local_edits() {
    let directory = tempfile::tempdir().unwrap();
    let (outbox, mut receiver) = outbox();
    let context = SessionContext::new(ProjectRoot::new(directory.path()), outbox);
    let mut session = Session::new(MemoryHost::default(), context, SessionConfig::default());
    session
        .announce(SharedBuffer::new(1, "a.txt", "abc"))
        .unwrap();
    let document = session
        .host()
        .find(&directory.path().join("a.txt"))
        .unwrap();
    session.host_mut().set_text(&document, "abcd").unwrap();
    session
        .host_mut()
        .set_cursor(&document, LineColumn::new(1, 5))
        .unwrap();

    let (events, inbox) = mpsc::unbounded_channel();
    events.send(Event::BufferChanged(document)).unwrap();
    events
        .send(Event::SelectionChanged {
            document,
            is_edit: true,
        })
        .unwrap();
    events
        .send(Event::LocalChangeAccepted {
            buffer_id: 1.into(),
            text: "abcd".to_owned(),
        })
        .unwrap();
    events.send(Event::BufferChanged(document)).unwrap();
    drop(events);

    session.run(inbox).await;

    assert_eq!(receiver.drain_changes(), vec![BufferId::from(1)]);

    let selections = receiver.drain_selections();
    assert_eq!(selections.len(), 1);
    assert_eq!(selections[0].selections[0].start, 4);
    assert!(selections[0].is_edit);

    session.shutdown();
    assert!(session.context().registry.is_empty());
}
