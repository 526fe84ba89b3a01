use console::style;
use std::fmt;

/// Colors used for konan's own output.
pub struct Theme;

impl Theme {
    pub fn bold(text: impl fmt::Display) -> String {
        style(text).bold().to_string()
    }

    pub fn success(text: impl fmt::Display) -> String {
        style(text).green().bold().to_string()
    }

    pub fn warning(text: impl fmt::Display) -> String {
        style(text).yellow().bold().to_string()
    }

    /// Engine output and other secondary text.
    pub fn muted(text: impl fmt::Display) -> String {
        style(text).dim().to_string()
    }
}
