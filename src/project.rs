use std::path::{Component, Path, PathBuf};

use crate::errors::SyncError;

/// The directory every shared buffer lives under. Buffers are keyed by their
/// `/`-separated path relative to this root, regardless of the platform's
/// separator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRoot {
    root: PathBuf,
}

impl ProjectRoot {
    /// Relative roots are resolved against the working directory right away,
    /// because hosts report the paths of their documents as absolute paths.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let root = std::path::absolute(&root).unwrap_or(root);

        Self { root }
    }

    #[must_use]
    pub fn root(&self) -> &Path { &self.root }

    /// Relative path of `path` inside the project, or `None` if the file is
    /// not shared because it lives outside of it.
    #[must_use]
    pub fn relative_path(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;

        let mut parts = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(part) => parts.push(part.to_str()?.to_owned()),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
            }
        }

        if parts.is_empty() {
            return None;
        }

        Some(parts.join("/"))
    }

    /// Where the buffer at `relative_path` is materialized on disk. Remote
    /// paths that are absolute or climb out of the root are rejected.
    pub fn full_path(&self, relative_path: &str) -> Result<PathBuf, SyncError> {
        let outside = || SyncError::OutsideProject {
            path: relative_path.to_owned(),
        };

        let mut full_path = self.root.clone();
        let mut has_file_name = false;
        for component in Path::new(relative_path).components() {
            match component {
                Component::Normal(part) => {
                    full_path.push(part);
                    has_file_name = true;
                }
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(outside());
                }
            }
        }

        if !has_file_name {
            return Err(outside());
        }

        Ok(full_path)
    }
}
