use crate::core::context::{current_dir, Context};
use anyhow::Result;
use clap::Parser;
use konan::application::{init_project, InitOptions};
use konan::domain::Language;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
pub struct InitCommand {
    /// Language of the model service (python or R)
    #[arg(long, short)]
    pub language: Option<Language>,

    /// Directory to create the project in
    #[arg(long)]
    pub project_path: Option<PathBuf>,

    /// Regenerate the templates over an existing project
    #[arg(long = "override")]
    pub overwrite: bool,
}

impl InitCommand {
    pub async fn execute(self, _ctx: &Context) -> Result<()> {
        cliclack::intro(console::style("Konan Init").bold())?;

        let language = match self.language {
            Some(language) => language,
            None => cliclack::select("Which language is your model written in?")
                .item(Language::Python, "Python", "")
                .item(Language::R, "R", "")
                .interact()?,
        };

        let project_root = match self.project_path {
            Some(path) => path,
            None => current_dir()?,
        };
        std::fs::create_dir_all(&project_root)?;
        let project_root = std::fs::canonicalize(&project_root)?;

        cliclack::log::step(format!("Initializing {} project...", language))?;
        let settings = init_project(&InitOptions {
            language,
            project_root,
            overwrite: self.overwrite,
        })?;

        cliclack::log::info(format!(
            "Put your model code in {} and weights in its artifacts/ folder.",
            settings.model_dir.display()
        ))?;
        cliclack::outro(format!("Initialized {} project!", language))?;
        Ok(())
    }
}
