use crate::core::context::Context;
use crate::ui::ClackInteraction;
use anyhow::Result;
use clap::Args;
use konan::application::AuthService;
use konan::domain::ports::platform_api::LoginRequest;
use konan::domain::Interaction;

#[derive(Args, Debug)]
pub struct LoginCommand {
    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub password: Option<String>,

    /// Log in with an API key instead of email and password
    #[arg(long, conflicts_with_all = ["email", "password"])]
    pub api_key: Option<String>,
}

impl LoginCommand {
    pub async fn execute(self, ctx: &mut Context) -> Result<()> {
        cliclack::intro(console::style("Konan Login").bold())?;
        let ui = ClackInteraction;

        let request = match self.api_key {
            Some(key) => LoginRequest::ApiKey(key),
            None => LoginRequest::Password {
                email: match self.email {
                    Some(email) => email,
                    None => ui.input("Email", None)?,
                },
                password: match self.password {
                    Some(password) => password,
                    None => ui.secret("Password")?,
                },
            },
        };

        let platform = ctx.platform()?;
        let spinner = cliclack::spinner();
        spinner.start("Authenticating...");
        let result = AuthService::new(&platform, &ctx.store)
            .login(&mut ctx.settings, request)
            .await;
        match result {
            Ok(()) => spinner.stop("Authenticated"),
            Err(e) => {
                spinner.error("Login failed");
                return Err(e.into());
            }
        }

        match &ctx.settings.organization_id {
            Some(org) => cliclack::outro(format!("Logged in to organization {}", org))?,
            None => cliclack::outro("Logged in")?,
        }
        Ok(())
    }
}
