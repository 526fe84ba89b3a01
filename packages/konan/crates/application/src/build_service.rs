use domain::entities::validate_reference;
use domain::ports::container_engine::BuiltImage;
use domain::{
    ContainerEngine, Interaction, KonanError, ProjectSettings, ProjectSettingsStore, Result,
};
use infrastructure::system::overlay_dir;
use infrastructure::TemplateSet;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct BuildRequest {
    pub image_tag: String,
    /// Only assemble the build context.
    pub dry_run: bool,
    /// Echo every engine log line as it arrives.
    pub verbose: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    ContextOnly { context: PathBuf },
    Built { context: PathBuf, image: BuiltImage },
}

/// Assembles the build context: the full template set first, then the user's
/// model directory on top so user files win every collision. Nothing is ever
/// removed from `build_dir`.
pub fn build_context(
    templates: &TemplateSet,
    base_image: &str,
    model_dir: &Path,
    build_dir: &Path,
) -> Result<()> {
    if !model_dir.is_dir() {
        return Err(KonanError::Precondition(format!(
            "Model directory {:?} is missing, run `konan init --override` to restore it.",
            model_dir
        )));
    }

    if build_dir.starts_with(model_dir) {
        return Err(KonanError::Precondition(format!(
            "Build directory {:?} must not live inside the model directory {:?}.",
            build_dir, model_dir
        )));
    }

    templates.materialize(build_dir, base_image)?;
    overlay_dir(model_dir, build_dir)?;

    tracing::debug!(?build_dir, "build context ready");
    Ok(())
}

pub struct BuildService<'a> {
    engine: &'a dyn ContainerEngine,
    ui: &'a dyn Interaction,
}

impl<'a> BuildService<'a> {
    pub fn new(engine: &'a dyn ContainerEngine, ui: &'a dyn Interaction) -> Self {
        Self { engine, ui }
    }

    pub fn prepare_context(&self, settings: &ProjectSettings) -> Result<PathBuf> {
        let templates = TemplateSet::for_language(settings.language);
        build_context(
            &templates,
            &settings.base_image,
            &settings.model_dir,
            &settings.build_dir,
        )?;
        Ok(settings.build_dir.clone())
    }

    /// Builds the project image and records it as the latest built image.
    pub async fn build(
        &self,
        store: &ProjectSettingsStore,
        settings: &mut ProjectSettings,
        request: &BuildRequest,
    ) -> Result<BuildOutcome> {
        validate_reference(&request.image_tag)?;

        self.ui.step("Preparing build context...");
        let context = self.prepare_context(settings)?;

        if request.dry_run {
            self.ui
                .info(&format!("Dry run: build context written to {:?}", context));
            return Ok(BuildOutcome::ContextOnly { context });
        }

        self.ui
            .step(&format!("Building image {}...", request.image_tag));
        let ui = self.ui;
        let verbose = request.verbose;
        let mut echo = |line: &str| {
            if verbose {
                ui.stream(line);
            }
        };
        let image = self
            .engine
            .build_image(&context, &request.image_tag, &mut echo)
            .await?;

        let tag = image
            .primary_tag()
            .unwrap_or(request.image_tag.as_str())
            .to_string();
        settings.latest_built_image = Some(tag.clone());
        store.save(settings)?;

        tracing::info!(image = %tag, id = %image.id, "image built");
        self.ui.success(&format!("Built image {}", tag));
        Ok(BuildOutcome::Built { context, image })
    }
}
