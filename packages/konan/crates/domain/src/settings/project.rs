use super::{read_json, write_json};
use crate::entities::language::Language;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Per-project settings (`model.config.json` at the project root).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ProjectSettings {
    pub language: Language,
    pub base_image: String,
    pub project_root: PathBuf,
    /// User-editable scaffold (`konan_model/`).
    pub model_dir: PathBuf,
    /// Merged build context (`.konan_build/`).
    pub build_dir: PathBuf,
    #[serde(default)]
    pub latest_built_image: Option<String>,
}

impl ProjectSettings {
    pub fn new(language: Language, project_root: &Path) -> Self {
        Self {
            language,
            base_image: language.default_base_image().to_string(),
            project_root: project_root.to_path_buf(),
            model_dir: project_root.join(ProjectSettingsStore::MODEL_DIR),
            build_dir: project_root.join(ProjectSettingsStore::BUILD_DIR),
            latest_built_image: None,
        }
    }
}

/// Locates and persists the [`ProjectSettings`] of one project directory.
pub struct ProjectSettingsStore {
    root: PathBuf,
}

impl ProjectSettingsStore {
    pub const FILE_NAME: &'static str = "model.config.json";
    pub const MODEL_DIR: &'static str = "konan_model";
    pub const BUILD_DIR: &'static str = ".konan_build";

    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self) -> PathBuf {
        self.root.join(Self::FILE_NAME)
    }

    pub fn model_dir(&self) -> PathBuf {
        self.root.join(Self::MODEL_DIR)
    }

    pub fn exists(&self) -> bool {
        self.path().exists()
    }

    pub fn load(&self) -> Result<ProjectSettings> {
        let settings = read_json(&self.path())?;
        tracing::debug!(root = ?self.root, "loaded project settings");
        Ok(settings)
    }

    pub fn save(&self, settings: &ProjectSettings) -> Result<()> {
        write_json(&self.path(), settings)?;
        tracing::debug!(root = ?self.root, "saved project settings");
        Ok(())
    }
}
