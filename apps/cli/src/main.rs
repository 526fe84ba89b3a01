mod commands;
mod core;
mod ui;

use clap::{Parser, Subcommand};
use commands::{
    BuildCommand, ConfigCommand, InitCommand, LoginCommand, PublishCommand, TestCommand,
};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "KONAN_LOG";
const QUIET_FILTER: &str = "warn";
const VERBOSE_FILTER: &str = "warn,konan=debug,domain=debug,infrastructure=debug,application=debug";

#[derive(Parser)]
#[command(name = "konan", version)]
#[command(about = "Create, test and publish machine-learning model services", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in to the Konan platform
    Login(LoginCommand),
    /// Show or change the global settings
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Scaffold a new model project
    Init(InitCommand),
    /// Build the model service image
    Build(BuildCommand),
    /// Run the latest built image and probe its endpoints
    Test(TestCommand),
    /// Push an image to the platform registry
    Publish(PublishCommand),
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose());

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            core::error::render(&err);
            ExitCode::FAILURE
        }
    }
}

impl Cli {
    fn verbose(&self) -> bool {
        matches!(&self.command, Commands::Build(cmd) if cmd.verbose)
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut ctx = core::context::Context::load()?;
    tracing::debug!(settings = ?ctx.store.path(), "global settings loaded");

    match cli.command {
        Commands::Login(cmd) => cmd.execute(&mut ctx).await,
        Commands::Config(cmd) => cmd.execute(&mut ctx).await,
        Commands::Init(cmd) => cmd.execute(&ctx).await,
        Commands::Build(cmd) => cmd.execute(&ctx).await,
        Commands::Test(cmd) => cmd.execute(&ctx).await,
        Commands::Publish(cmd) => cmd.execute(&mut ctx).await,
    }
}

fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        VERBOSE_FILTER
    } else {
        QUIET_FILTER
    }
}

/// `KONAN_LOG` always wins over the filter picked from the command line.
fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
