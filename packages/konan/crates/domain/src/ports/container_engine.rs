use crate::error::Result;
use crate::ports::platform_api::RegistryCredentials;
use async_trait::async_trait;
use std::path::Path;

/// Receives build and push output one line at a time, as it is produced.
pub type LogSink<'a> = &'a mut (dyn FnMut(&str) + Send);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltImage {
    pub id: String,
    pub tags: Vec<String>,
}

impl BuiltImage {
    pub fn primary_tag(&self) -> Option<&str> {
        self.tags.first().map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortBinding {
    pub host: u16,
    pub container: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerHandle {
    pub id: String,
}

/// The operations konan needs from a local container engine.
#[async_trait]
pub trait ContainerEngine: Send + Sync {
    /// Builds `context` into an image tagged `tag`, streaming the engine output.
    /// A failed build surfaces the engine's own message as `KonanError::Build`.
    async fn build_image(&self, context: &Path, tag: &str, logs: LogSink<'_>)
        -> Result<BuiltImage>;

    /// Runs `command` in a throwaway container and returns its output.
    async fn run_once(&self, image: &str, command: &[&str]) -> Result<String>;

    /// Creates a container for `image` without starting it.
    async fn create_container(&self, image: &str, ports: PortBinding) -> Result<ContainerHandle>;

    async fn start_container(&self, container: &ContainerHandle) -> Result<()>;

    async fn stop_and_remove(&self, container: &ContainerHandle) -> Result<()>;

    /// Last `lines` lines written by the container.
    async fn container_logs(&self, container: &ContainerHandle, lines: usize) -> Result<String>;

    async fn image_exists(&self, reference: &str) -> Result<bool>;

    async fn tag_image(&self, source: &str, target: &str) -> Result<()>;

    async fn login(&self, registry: &str, credentials: &RegistryCredentials) -> Result<()>;

    async fn push(&self, reference: &str, progress: LogSink<'_>) -> Result<()>;
}
