mod common;

use application::{init_project, BuildOutcome, BuildRequest, BuildService, InitOptions};
use common::{FakeEngine, ScriptedUi};
use domain::{KonanError, Language, ProjectSettings, ProjectSettingsStore};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::{tempdir, TempDir};

fn project() -> (TempDir, ProjectSettingsStore, ProjectSettings) {
    let dir = tempdir().unwrap();
    let settings = init_project(&InitOptions {
        language: Language::Python,
        project_root: dir.path().to_path_buf(),
        overwrite: false,
    })
    .unwrap();
    let store = ProjectSettingsStore::new(dir.path());
    (dir, store, settings)
}

fn request(tag: &str, dry_run: bool) -> BuildRequest {
    BuildRequest {
        image_tag: tag.to_string(),
        dry_run,
        verbose: false,
    }
}

#[tokio::test]
async fn test_dry_run_builds_context_without_engine() {
    let (dir, store, mut settings) = project();
    fs::write(dir.path().join("konan_model/predict.py"), "# user predict").unwrap();
    let engine = FakeEngine::default();
    let ui = ScriptedUi::default();

    let outcome = BuildService::new(&engine, &ui)
        .build(&store, &mut settings, &request("churn:v1", true))
        .await
        .unwrap();

    let context = dir.path().join(".konan_build");
    assert_eq!(outcome, BuildOutcome::ContextOnly { context: context.clone() });
    assert_eq!(engine.count("build"), 0);

    // Scaffold files are present and user files win collisions.
    assert!(context.join("server.py").is_file());
    assert!(context.join("artifacts").is_dir());
    assert_eq!(fs::read_to_string(context.join("predict.py")).unwrap(), "# user predict");
    let dockerfile = fs::read_to_string(context.join("Dockerfile")).unwrap();
    assert!(dockerfile.contains("FROM python:3.10-slim-stretch"));

    assert!(store.load().unwrap().latest_built_image.is_none());
}

#[tokio::test]
async fn test_build_records_latest_image_across_reload() {
    let (_dir, store, mut settings) = project();
    let engine = FakeEngine {
        build_log: vec!["Step 1/6 : FROM python:3.10-slim-stretch".to_string()],
        ..FakeEngine::default()
    };
    let ui = ScriptedUi::default();

    let outcome = BuildService::new(&engine, &ui)
        .build(&store, &mut settings, &request("churn:v1", false))
        .await
        .unwrap();

    assert!(matches!(outcome, BuildOutcome::Built { ref image, .. } if image.tags == ["churn:v1"]));
    assert_eq!(engine.count("build"), 1);
    assert_eq!(settings.latest_built_image.as_deref(), Some("churn:v1"));
    assert_eq!(store.load().unwrap().latest_built_image.as_deref(), Some("churn:v1"));
    // Quiet builds do not echo the engine log.
    assert!(ui.streamed().is_empty());
}

#[tokio::test]
async fn test_verbose_build_streams_log_lines() {
    let (_dir, store, mut settings) = project();
    let engine = FakeEngine {
        build_log: vec!["Step 1/6".to_string(), "Step 2/6".to_string()],
        ..FakeEngine::default()
    };
    let ui = ScriptedUi::default();

    BuildService::new(&engine, &ui)
        .build(
            &store,
            &mut settings,
            &BuildRequest {
                image_tag: "churn:v1".to_string(),
                dry_run: false,
                verbose: true,
            },
        )
        .await
        .unwrap();

    assert_eq!(ui.streamed(), vec!["Step 1/6", "Step 2/6"]);
}

#[tokio::test]
async fn test_engine_failure_is_surfaced_and_nothing_recorded() {
    let (_dir, store, mut settings) = project();
    let engine = FakeEngine {
        build_failure: Some("pip install returned a non-zero code: 1".to_string()),
        ..FakeEngine::default()
    };
    let ui = ScriptedUi::default();

    let err = BuildService::new(&engine, &ui)
        .build(&store, &mut settings, &request("churn:v1", false))
        .await
        .unwrap_err();

    assert!(matches!(err, KonanError::Build(msg) if msg.contains("non-zero code")));
    assert!(store.load().unwrap().latest_built_image.is_none());
}

#[tokio::test]
async fn test_invalid_reference_rejected_before_engine() {
    let (_dir, store, mut settings) = project();
    let engine = FakeEngine::default();
    let ui = ScriptedUi::default();

    let err = BuildService::new(&engine, &ui)
        .build(&store, &mut settings, &request("Churn Model", false))
        .await
        .unwrap_err();

    assert!(matches!(err, KonanError::InvalidImageReference(_)));
    assert!(engine.calls().is_empty());
}

#[tokio::test]
async fn test_build_dir_at_project_root_leaves_project_intact() {
    let (dir, store, mut settings) = project();
    fs::write(dir.path().join("konan_model/predict.py"), "# user predict").unwrap();
    settings.build_dir = dir.path().to_path_buf();
    let engine = FakeEngine::default();
    let ui = ScriptedUi::default();

    BuildService::new(&engine, &ui)
        .build(&store, &mut settings, &request("churn:v1", true))
        .await
        .unwrap();

    assert_eq!(
        fs::read_to_string(dir.path().join("konan_model/predict.py")).unwrap(),
        "# user predict"
    );
    assert!(store.exists());
    assert!(dir.path().join("Dockerfile").is_file());
}

#[tokio::test]
async fn test_build_dir_inside_model_dir_is_rejected() {
    let (dir, store, mut settings) = project();
    settings.build_dir = dir.path().join("konan_model/.build");
    let engine = FakeEngine::default();
    let ui = ScriptedUi::default();

    let err = BuildService::new(&engine, &ui)
        .build(&store, &mut settings, &request("churn:v1", true))
        .await
        .unwrap_err();

    assert!(matches!(err, KonanError::Precondition(_)));
    assert!(!dir.path().join("konan_model/.build").exists());
    assert!(dir.path().join("konan_model/predict.py").is_file());
}

#[tokio::test]
async fn test_repeated_context_builds_converge() {
    let (dir, store, mut settings) = project();
    let engine = FakeEngine::default();
    let ui = ScriptedUi::default();
    let service = BuildService::new(&engine, &ui);

    fs::write(dir.path().join("konan_model/predict.py"), "v1").unwrap();
    service.build(&store, &mut settings, &request("churn:v1", true)).await.unwrap();
    fs::write(dir.path().join("konan_model/predict.py"), "v2").unwrap();
    service.build(&store, &mut settings, &request("churn:v1", true)).await.unwrap();

    let context = dir.path().join(".konan_build");
    assert_eq!(fs::read_to_string(context.join("predict.py")).unwrap(), "v2");
    assert!(context.join("server.py").is_file());
}
