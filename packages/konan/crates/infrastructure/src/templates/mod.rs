//! Language template sets embedded in the binary.
//!
//! User files are copied into `konan_model/` by `init` and belong to the user
//! from then on. Scaffold files only ever land in the build context.

use domain::{KonanError, Language, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const ARTIFACTS_DIR: &str = "artifacts";

const BASE_IMAGE_PLACEHOLDER: &str = "{{base_image}}";

#[derive(Debug, Clone, Copy)]
pub struct TemplateFile {
    pub name: &'static str,
    pub contents: &'static str,
}

const PYTHON_USER_FILES: &[TemplateFile] = &[
    TemplateFile {
        name: "predict.py",
        contents: include_str!("../../templates/python/predict.py"),
    },
    TemplateFile {
        name: "retrain.py",
        contents: include_str!("../../templates/python/retrain.py"),
    },
    TemplateFile {
        name: "requirements.txt",
        contents: include_str!("../../templates/python/requirements.txt"),
    },
];

const PYTHON_SCAFFOLD_FILES: &[TemplateFile] = &[
    TemplateFile {
        name: "server.py",
        contents: include_str!("../../templates/python/server.py"),
    },
    TemplateFile {
        name: "Dockerfile",
        contents: include_str!("../../templates/python/Dockerfile"),
    },
];

const R_USER_FILES: &[TemplateFile] = &[
    TemplateFile {
        name: "predict.R",
        contents: include_str!("../../templates/R/predict.R"),
    },
    TemplateFile {
        name: "retrain.R",
        contents: include_str!("../../templates/R/retrain.R"),
    },
    TemplateFile {
        name: "install.R",
        contents: include_str!("../../templates/R/install.R"),
    },
];

const R_SCAFFOLD_FILES: &[TemplateFile] = &[
    TemplateFile {
        name: "server.R",
        contents: include_str!("../../templates/R/server.R"),
    },
    TemplateFile {
        name: "Dockerfile",
        contents: include_str!("../../templates/R/Dockerfile"),
    },
];

#[derive(Debug, Clone, Copy)]
pub struct TemplateSet {
    language: Language,
    user_files: &'static [TemplateFile],
    scaffold_files: &'static [TemplateFile],
}

impl TemplateSet {
    pub fn for_language(language: Language) -> Self {
        let (user_files, scaffold_files) = match language {
            Language::Python => (PYTHON_USER_FILES, PYTHON_SCAFFOLD_FILES),
            Language::R => (R_USER_FILES, R_SCAFFOLD_FILES),
        };

        Self {
            language,
            user_files,
            scaffold_files,
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn user_files(&self) -> &'static [TemplateFile] {
        self.user_files
    }

    pub fn scaffold_files(&self) -> &'static [TemplateFile] {
        self.scaffold_files
    }

    /// Copies the user files plus an empty `artifacts/` into `destination`.
    /// Refuses to touch a non-empty destination unless `overwrite` is set.
    pub fn provision(&self, destination: &Path, overwrite: bool) -> Result<Vec<PathBuf>> {
        if !overwrite && has_entries(destination)? {
            return Err(KonanError::Io(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{:?} already contains files", destination),
            )));
        }

        fs::create_dir_all(destination)?;

        let mut written = Vec::with_capacity(self.user_files.len());
        for file in self.user_files {
            let path = destination.join(file.name);
            fs::write(&path, file.contents)?;
            written.push(path);
        }
        fs::create_dir_all(destination.join(ARTIFACTS_DIR))?;

        tracing::info!(language = %self.language, ?destination, "provisioned templates");
        Ok(written)
    }

    /// Writes the complete template set (user + scaffold files) into a build
    /// context, rendering the base image into the Dockerfile.
    pub fn materialize(&self, destination: &Path, base_image: &str) -> Result<()> {
        fs::create_dir_all(destination)?;

        for file in self.user_files.iter().chain(self.scaffold_files) {
            let contents = file.contents.replace(BASE_IMAGE_PLACEHOLDER, base_image);
            fs::write(destination.join(file.name), contents)?;
        }
        fs::create_dir_all(destination.join(ARTIFACTS_DIR))?;

        Ok(())
    }
}

fn has_entries(dir: &Path) -> Result<bool> {
    if !dir.exists() {
        return Ok(false);
    }
    Ok(fs::read_dir(dir)?.next().is_some())
}
