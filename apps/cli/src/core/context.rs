use anyhow::Result;
use konan::domain::{GlobalSettings, GlobalSettingsStore, ProjectSettings, ProjectSettingsStore};
use konan::infrastructure::{DockerCli, HttpPlatformClient};
use std::path::{Path, PathBuf};

/// State shared by every command: the global settings, loaded once at entry.
pub struct Context {
    pub store: GlobalSettingsStore,
    pub settings: GlobalSettings,
}

/// A loaded project record together with the store it came from.
pub struct Project {
    pub store: ProjectSettingsStore,
    pub settings: ProjectSettings,
}

impl Context {
    /// Loads the global settings, writing defaults on first run.
    pub fn load() -> Result<Self> {
        let store = GlobalSettingsStore::at_default_location()?;
        let settings = store.load_or_init()?;
        Ok(Self { store, settings })
    }

    pub fn engine(&self) -> Result<DockerCli> {
        let engine = DockerCli::locate()?;
        tracing::debug!(binary = ?engine.binary(), "container engine located");
        Ok(engine)
    }

    pub fn platform(&self) -> Result<HttpPlatformClient> {
        Ok(HttpPlatformClient::new(
            &self.settings.api_url,
            &self.settings.auth_url,
        )?)
    }

    /// The project in `root`, or `None` when it was never initialized.
    pub fn project(&self, root: &Path) -> Result<Option<Project>> {
        let store = ProjectSettingsStore::new(root);
        if !store.exists() {
            return Ok(None);
        }
        let settings = store.load()?;
        tracing::debug!(root = ?root, language = %settings.language, "project loaded");
        Ok(Some(Project { store, settings }))
    }
}

pub fn current_dir() -> Result<PathBuf> {
    Ok(std::env::current_dir()?)
}
