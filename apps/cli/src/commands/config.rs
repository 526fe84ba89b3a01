use crate::core::context::Context;
use crate::ui::Theme;
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the settings file location and contents
    Show,
    /// Change selected settings
    Set(SetArgs),
}

#[derive(Args, Debug)]
pub struct SetArgs {
    /// Data root of the local docker engine
    #[arg(long)]
    pub docker_path: Option<String>,

    #[arg(long)]
    pub api_key: Option<String>,
}

impl ConfigCommand {
    pub async fn execute(self, ctx: &mut Context) -> Result<()> {
        match self {
            ConfigCommand::Show => show(ctx).await,
            ConfigCommand::Set(args) => set(ctx, args),
        }
    }
}

async fn show(ctx: &Context) -> Result<()> {
    println!("{} {}", Theme::bold("Settings file:"), ctx.store.path().display());
    println!("{}", serde_json::to_string_pretty(&ctx.settings)?);

    let engine = match ctx.engine() {
        Ok(docker) if docker.is_available().await => {
            Theme::success(format!("available ({})", docker.binary().display()))
        }
        Ok(docker) => Theme::warning(format!(
            "installed at {} but not responding",
            docker.binary().display()
        )),
        Err(_) => Theme::warning("not installed"),
    };
    println!("{} {}", Theme::bold("Docker:"), engine);
    Ok(())
}

fn set(ctx: &mut Context, args: SetArgs) -> Result<()> {
    if args.docker_path.is_none() && args.api_key.is_none() {
        cliclack::log::info("Nothing to change. Pass --docker-path or --api-key.")?;
        return Ok(());
    }

    if let Some(path) = args.docker_path {
        ctx.settings.docker_path = path;
    }
    if let Some(key) = args.api_key {
        ctx.settings.api_key = Some(key);
    }
    ctx.store.save(&ctx.settings)?;

    cliclack::log::success(format!("Saved {}", ctx.store.path().display()))?;
    Ok(())
}
