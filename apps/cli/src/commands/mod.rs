pub mod build;
pub mod config;
pub mod init;
pub mod login;
pub mod publish;

pub use build::BuildCommand;
pub use config::ConfigCommand;
pub use init::InitCommand;
pub use login::LoginCommand;
pub use publish::PublishCommand;
pub use test::TestCommand;

use crate::core::context::{current_dir, Context, Project};
use anyhow::Result;

/// The project in the working directory. An uninitialized directory is
/// reported to the user and yields `None` rather than an error.
pub(crate) fn require_project(ctx: &Context) -> Result<Option<Project>> {
    let project = ctx.project(&current_dir()?)?;
    if project.is_none() {
        cliclack::log::warning("No konan project here, run `konan init` first.")?;
    }
    Ok(project)
}
