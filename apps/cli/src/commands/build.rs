use super::require_project;
use crate::core::context::Context;
use crate::ui::ClackInteraction;
use anyhow::Result;
use clap::Parser;
use konan::application::{BuildOutcome, BuildRequest, BuildService};

#[derive(Parser, Debug, Clone)]
pub struct BuildCommand {
    /// Tag for the built image, e.g. churn-model:v1
    #[arg(long)]
    pub image_name: String,

    /// Only assemble the build context in .konan_build/
    #[arg(long)]
    pub dry_run: bool,

    /// Stream the docker build output
    #[arg(long, short)]
    pub verbose: bool,
}

impl BuildCommand {
    pub async fn execute(self, ctx: &Context) -> Result<()> {
        cliclack::intro(console::style("Konan Build").bold())?;
        let Some(mut project) = require_project(ctx)? else {
            return Ok(());
        };

        let engine = ctx.engine()?;
        let request = BuildRequest {
            image_tag: self.image_name,
            dry_run: self.dry_run,
            verbose: self.verbose,
        };

        let outcome = BuildService::new(&engine, &ClackInteraction)
            .build(&project.store, &mut project.settings, &request)
            .await?;

        match outcome {
            BuildOutcome::ContextOnly { context } => {
                cliclack::outro(format!("Build context ready in {}", context.display()))?
            }
            BuildOutcome::Built { image, .. } => cliclack::outro(format!(
                "Image {} is ready, run `konan test` to try it",
                image.primary_tag().unwrap_or(&image.id)
            ))?,
        }
        Ok(())
    }
}
