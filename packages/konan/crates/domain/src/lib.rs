pub mod entities;
pub mod error;
pub mod ports;
pub mod settings;

pub use entities::language::Language;
pub use error::{AuthError, KonanError, Result};
pub use ports::container_engine::ContainerEngine;
pub use ports::interaction::Interaction;
pub use ports::platform_api::PlatformApi;
pub use settings::{GlobalSettings, GlobalSettingsStore, ProjectSettings, ProjectSettingsStore};
