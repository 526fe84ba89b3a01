use super::require_project;
use crate::core::context::Context;
use crate::ui::ClackInteraction;
use anyhow::Result;
use clap::Parser;
use konan::application::PublishService;

#[derive(Parser, Debug, Clone)]
pub struct PublishCommand {
    /// Local image to publish; defaults to the project's latest build
    #[arg(long)]
    pub image_tag: Option<String>,
}

impl PublishCommand {
    pub async fn execute(self, ctx: &mut Context) -> Result<()> {
        cliclack::intro(console::style("Konan Publish").bold())?;

        let Some(project) = require_project(ctx)? else {
            return Ok(());
        };
        let engine = ctx.engine()?;
        let platform = ctx.platform()?;

        let target = PublishService::new(&engine, &platform, &ClackInteraction, &ctx.store)
            .publish(
                &mut ctx.settings,
                Some(&project.settings),
                self.image_tag.as_deref(),
            )
            .await?;

        cliclack::outro(format!("Deploy {} from the Konan dashboard", target))?;
        Ok(())
    }
}
