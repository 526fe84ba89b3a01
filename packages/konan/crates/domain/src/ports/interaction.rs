use crate::error::Result;

/// Everything konan asks of, or tells, the person at the terminal.
/// Workflows receive it by reference so they run headless under test.
pub trait Interaction: Send + Sync {
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool>;

    fn input(&self, prompt: &str, default: Option<&str>) -> Result<String>;

    fn secret(&self, prompt: &str) -> Result<String>;

    fn step(&self, message: &str);

    fn info(&self, message: &str);

    fn success(&self, message: &str);

    fn warn(&self, message: &str);

    fn error(&self, message: &str);

    /// Raw engine output (build logs, push progress).
    fn stream(&self, line: &str);
}
