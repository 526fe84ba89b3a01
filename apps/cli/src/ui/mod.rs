pub mod prompt;
pub mod theme;

pub use prompt::ClackInteraction;
pub use theme::Theme;
