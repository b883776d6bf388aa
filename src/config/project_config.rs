use std::path::PathBuf;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{consts::DEFAULT_PROJECT_ROOT, coordinates::LineEnding, project::ProjectRoot};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ProjectConfig {
    /// Directory the shared buffers are materialized under.
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Line terminator of the host editor.
    #[serde(default = "default_line_ending")]
    pub line_ending: LineEnding,
}

impl ProjectConfig {
    #[must_use]
    pub fn project_root(&self) -> ProjectRoot { ProjectRoot::new(self.root.clone()) }
}

fn default_root() -> PathBuf {
    debug!("Using default project root: {DEFAULT_PROJECT_ROOT}");
    PathBuf::from(DEFAULT_PROJECT_ROOT)
}

fn default_line_ending() -> LineEnding {
    let line_ending = LineEnding::default();
    debug!("Using default line ending: {line_ending:?}");
    line_ending
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            line_ending: default_line_ending(),
        }
    }
}
