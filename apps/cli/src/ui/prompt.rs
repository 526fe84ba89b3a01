use super::Theme;
use konan::domain::{Interaction, KonanError, Result};
use std::io;

/// Terminal prompts and log lines rendered by cliclack.
pub struct ClackInteraction;

fn prompt_error(err: io::Error) -> KonanError {
    match err.kind() {
        io::ErrorKind::Interrupted => KonanError::Cancelled,
        _ => KonanError::Io(err),
    }
}

impl Interaction for ClackInteraction {
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        cliclack::confirm(prompt)
            .initial_value(default)
            .interact()
            .map_err(prompt_error)
    }

    fn input(&self, prompt: &str, default: Option<&str>) -> Result<String> {
        let mut input = cliclack::input(prompt);
        if let Some(default) = default {
            input = input.default_input(default);
        }
        input.interact().map_err(prompt_error)
    }

    fn secret(&self, prompt: &str) -> Result<String> {
        cliclack::password(prompt)
            .mask('▪')
            .interact()
            .map_err(prompt_error)
    }

    fn step(&self, message: &str) {
        let _ = cliclack::log::step(message);
    }

    fn info(&self, message: &str) {
        let _ = cliclack::log::info(message);
    }

    fn success(&self, message: &str) {
        let _ = cliclack::log::success(message);
    }

    fn warn(&self, message: &str) {
        let _ = cliclack::log::warning(message);
    }

    fn error(&self, message: &str) {
        let _ = cliclack::log::error(message);
    }

    fn stream(&self, line: &str) {
        println!("{}", Theme::muted(line));
    }
}
