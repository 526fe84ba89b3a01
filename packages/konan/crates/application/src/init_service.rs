use domain::{KonanError, Language, ProjectSettings, ProjectSettingsStore, Result};
use infrastructure::TemplateSet;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct InitOptions {
    pub language: Language,
    pub project_root: PathBuf,
    /// Regenerate templates and settings over an existing project.
    pub overwrite: bool,
}

/// Provisions `konan_model/` and writes a fresh `model.config.json`.
pub fn init_project(options: &InitOptions) -> Result<ProjectSettings> {
    let store = ProjectSettingsStore::new(&options.project_root);
    let model_dir = store.model_dir();

    if !options.overwrite && (store.exists() || model_dir.exists()) {
        return Err(KonanError::AlreadyInitialized(options.project_root.clone()));
    }

    fs::create_dir_all(&options.project_root)?;
    TemplateSet::for_language(options.language).provision(&model_dir, options.overwrite)?;

    let settings = ProjectSettings::new(options.language, &options.project_root);
    store.save(&settings)?;

    tracing::info!(root = ?options.project_root, language = %options.language, "initialized project");
    Ok(settings)
}
