//! Whole-record JSON persistence for user-wide and per-project settings.

pub mod global;
pub mod project;

pub use global::{GlobalSettings, GlobalSettingsStore};
pub use project::{ProjectSettings, ProjectSettingsStore};

use crate::error::{KonanError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(KonanError::NotFound(path.to_path_buf()));
    }

    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|source| KonanError::InvalidSettings {
        path: path.to_path_buf(),
        source,
    })
}

// Not atomic: an interrupted write can leave a truncated file behind.
fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let content = serde_json::to_string_pretty(value).map_err(|source| {
        KonanError::InvalidSettings {
            path: path.to_path_buf(),
            source,
        }
    })?;
    fs::write(path, content)?;
    Ok(())
}
