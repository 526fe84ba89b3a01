pub mod adapters;
pub mod system;
pub mod templates;

pub use adapters::docker::DockerCli;
pub use adapters::platform::HttpPlatformClient;
pub use templates::TemplateSet;
