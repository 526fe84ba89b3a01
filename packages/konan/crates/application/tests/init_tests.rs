use application::{init_project, InitOptions};
use domain::{KonanError, Language, ProjectSettingsStore};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::tempdir;

fn options(root: &std::path::Path, overwrite: bool) -> InitOptions {
    InitOptions {
        language: Language::Python,
        project_root: root.to_path_buf(),
        overwrite,
    }
}

#[test]
fn test_init_writes_scaffold_and_settings() {
    let dir = tempdir().unwrap();

    let settings = init_project(&options(dir.path(), false)).unwrap();

    let store = ProjectSettingsStore::new(dir.path());
    assert_eq!(store.load().unwrap(), settings);
    assert!(settings.latest_built_image.is_none());
    assert!(dir.path().join("konan_model/predict.py").is_file());
    assert!(dir.path().join("konan_model/artifacts").is_dir());
}

#[test]
fn test_second_init_is_refused_and_leaves_scaffold_untouched() {
    let dir = tempdir().unwrap();
    init_project(&options(dir.path(), false)).unwrap();

    let predict = dir.path().join("konan_model/predict.py");
    fs::write(&predict, "# my model").unwrap();

    let err = init_project(&options(dir.path(), false)).unwrap_err();
    assert!(matches!(err, KonanError::AlreadyInitialized(_)));
    assert_eq!(fs::read_to_string(&predict).unwrap(), "# my model");
}

#[test]
fn test_scaffold_directory_alone_blocks_init() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("konan_model")).unwrap();

    let err = init_project(&options(dir.path(), false)).unwrap_err();
    assert!(matches!(err, KonanError::AlreadyInitialized(_)));
    assert!(!ProjectSettingsStore::new(dir.path()).exists());
}

#[test]
fn test_override_succeeds_over_existing_project() {
    let dir = tempdir().unwrap();
    init_project(&options(dir.path(), false)).unwrap();
    fs::write(dir.path().join("konan_model/artifacts/model.pkl"), b"weights").unwrap();

    let settings = init_project(&InitOptions {
        language: Language::R,
        project_root: dir.path().to_path_buf(),
        overwrite: true,
    })
    .unwrap();

    assert_eq!(settings.language, Language::R);
    assert_eq!(settings.base_image, "rocker/r-ver:4.2.1");
    assert!(dir.path().join("konan_model/predict.R").is_file());
    // User artifacts survive a regenerated scaffold.
    assert!(dir.path().join("konan_model/artifacts/model.pkl").is_file());
}
