use std::path::Path;

use anyhow::{Context as _, Result};
use log::info;
use project_config::ProjectConfig;
use serde::{Deserialize, Serialize};
use session_config::SessionConfig;
use tokio::fs;

pub mod project_config;
pub mod session_config;

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub project: ProjectConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

impl Config {
    /// Loads the configuration at `path` if there is one and writes the
    /// effective configuration back, so every default ends up spelled out.
    pub async fn read_or_create(path: &Path) -> Result<Self> {
        let config = if fs::try_exists(path).await.unwrap_or(false) {
            info!("Loading configuration from '{}'", path.display());
            Self::load_from_file(path).await?
        } else {
            Self::default()
        };

        config.write(path).await?;
        info!("Updated configuration at '{}'", path.display());

        Ok(config)
    }

    pub async fn load_from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).await.with_context(|| {
            format!(
                "Cannot load configuration from disk from {}",
                path.display()
            )
        })?;

        let config = serde_yaml::from_str(&contents).context("Failed to parse configuration")?;

        Ok(config)
    }

    pub async fn write(&self, path: &Path) -> Result<()> {
        let contents = serde_yaml::to_string(&self).context("Failed to serialize configuration")?;

        fs::write(path, contents)
            .await
            .context("Failed to write configuration to disk")
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::coordinates::LineEnding;

    #[tokio::test]
    async fn test_read_or_create_writes_defaults() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("config.yml");

        let config = Config::read_or_create(&path).await.unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(Config::load_from_file(&path).await.unwrap(), config);
    }

    #[tokio::test]
    async fn test_missing_fields_use_defaults() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("config.yml");
        fs::write(&path, "project:\n  line_ending: crlf\n")
            .await
            .unwrap();

        let config = Config::read_or_create(&path).await.unwrap();

        assert_eq!(config.project.root, PathBuf::from("."));
        assert_eq!(config.project.line_ending, LineEnding::CrLf);
        assert!(config.session.open_announced_buffers);

        let written = fs::read_to_string(&path).await.unwrap();
        assert!(written.contains("open_announced_buffers: true"));
        assert_eq!(serde_yaml::from_str::<Config>(&written).unwrap(), config);
    }

    #[tokio::test]
    async fn test_invalid_configuration_fails() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("config.yml");
        fs::write(&path, "project: [").await.unwrap();

        assert!(Config::read_or_create(&path).await.is_err());
    }
}
