use std::path::Path;

use anyhow::{Context as _, Result, bail};
use buffer_sync::{
    BufferId, Event, Host, LineColumn, OutboxReceiver, RemoteMessage, SelectionBroadcast, Session,
    host::memory::{DocumentId, MemoryHost},
};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use tokio::fs;

/// One thing that happens during a recorded session: either a message from
/// the remote side or something the user does in the editor.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum ScriptStep {
    Remote { message: RemoteMessage },

    /// The user opens a file that is not necessarily shared.
    Open { path: String, text: String },

    /// The user replaces the text of an open document.
    Edit { path: String, text: String },

    /// The user moves the cursor of an open document.
    Cursor {
        path: String,
        line: usize,
        column: usize,
    },

    /// The transport acknowledges an upload.
    Accept { buffer_id: BufferId, text: String },
}

#[derive(Debug, Serialize)]
pub struct Report {
    pub pending_changes: Vec<BufferId>,
    pub selections: Vec<SelectionBroadcast>,
    pub documents: Vec<DocumentReport>,
}

#[derive(Debug, Serialize)]
pub struct DocumentReport {
    pub path: String,
    pub text: String,
    pub cursor: LineColumn,
}

pub async fn load(path: &Path) -> Result<Vec<ScriptStep>> {
    let contents = fs::read_to_string(path)
        .await
        .with_context(|| format!("Cannot read script from {}", path.display()))?;

    serde_yaml::from_str(&contents).context("Failed to parse script")
}

/// Plays `steps` in order. Every editor action is followed by the
/// notification the editor would send for it.
pub fn replay(session: &mut Session<MemoryHost>, steps: Vec<ScriptStep>) -> Result<()> {
    info!("Replaying {} steps", steps.len());

    for step in steps {
        debug!("Replaying {step:?}");

        match step {
            ScriptStep::Remote { message } => session.dispatch(Event::Remote(message)),
            ScriptStep::Open { path, text } => {
                let full_path = session.context().project.full_path(&path)?;
                session.host_mut().open_with_text(Some(full_path), &text);
            }
            ScriptStep::Edit { path, text } => {
                let document = find(session, &path)?;
                session.host_mut().set_text(&document, &text)?;
                session.dispatch(Event::BufferChanged(document));
                session.dispatch(Event::SelectionChanged {
                    document,
                    is_edit: true,
                });
            }
            ScriptStep::Cursor { path, line, column } => {
                let document = find(session, &path)?;
                session
                    .host_mut()
                    .set_cursor(&document, LineColumn::new(line, column))?;
                session.dispatch(Event::SelectionChanged {
                    document,
                    is_edit: false,
                });
            }
            ScriptStep::Accept { buffer_id, text } => {
                session.dispatch(Event::LocalChangeAccepted { buffer_id, text });
            }
        }
    }

    Ok(())
}

pub fn report(session: &Session<MemoryHost>, receiver: &mut OutboxReceiver) -> Result<Report> {
    let host = session.host();
    let project = &session.context().project;

    let documents = host
        .documents()
        .into_iter()
        .map(|document| -> Result<DocumentReport> {
            let path = host
                .path(&document)
                .map(|path| {
                    project
                        .relative_path(&path)
                        .unwrap_or_else(|| path.display().to_string())
                })
                .unwrap_or_default();

            Ok(DocumentReport {
                path,
                text: host.text(&document)?,
                cursor: host.cursor(&document)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Report {
        pending_changes: receiver.drain_changes(),
        selections: receiver.drain_selections(),
        documents,
    })
}

fn find(session: &Session<MemoryHost>, path: &str) -> Result<DocumentId> {
    let full_path = session.context().project.full_path(path)?;

    match session.host().find(&full_path) {
        Some(document) => Ok(document),
        None => bail!("'{path}' is not open"),
    }
}
