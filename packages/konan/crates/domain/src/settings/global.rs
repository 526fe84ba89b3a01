use super::{read_json, write_json};
use crate::error::{KonanError, Result};
use crate::ports::platform_api::RegistryCredentials;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_API_URL: &str = "https://api.konan.ai";
pub const DEFAULT_AUTH_URL: &str = "https://auth.konan.ai";
pub const DEFAULT_REGISTRY_HOST: &str = "konan.azurecr.io";
pub const DEFAULT_DOCKER_PATH: &str = "/var/lib/docker";

/// User-wide settings (~/.konan/config.json).
/// Holds credentials and the platform endpoints every command talks to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GlobalSettings {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub organization_id: Option<String>,
    #[serde(default)]
    pub registry_token_name: Option<String>,
    #[serde(default)]
    pub registry_token_password: Option<String>,

    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_auth_url")]
    pub auth_url: String,
    #[serde(default = "default_registry_host")]
    pub registry_host: String,

    /// Data root of the local container engine.
    #[serde(default = "default_docker_path")]
    pub docker_path: String,

    // Derived on every load; persisted only for display.
    #[serde(default = "current_version")]
    version: String,
    #[serde(default = "host_runtime")]
    host_runtime: String,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            access_token: None,
            refresh_token: None,
            organization_id: None,
            registry_token_name: None,
            registry_token_password: None,
            api_url: default_api_url(),
            auth_url: default_auth_url(),
            registry_host: default_registry_host(),
            docker_path: default_docker_path(),
            version: current_version(),
            host_runtime: host_runtime(),
        }
    }
}

impl GlobalSettings {
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn host_runtime(&self) -> &str {
        &self.host_runtime
    }

    pub fn is_logged_in(&self) -> bool {
        self.access_token.is_some()
    }

    pub fn registry_credentials(&self) -> Option<RegistryCredentials> {
        match (&self.registry_token_name, &self.registry_token_password) {
            (Some(username), Some(password)) => Some(RegistryCredentials {
                username: username.clone(),
                password: password.clone(),
            }),
            _ => None,
        }
    }

    pub fn set_registry_credentials(&mut self, credentials: &RegistryCredentials) {
        self.registry_token_name = Some(credentials.username.clone());
        self.registry_token_password = Some(credentials.password.clone());
    }

    fn refresh_derived(&mut self) {
        self.version = current_version();
        self.host_runtime = host_runtime();
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_auth_url() -> String {
    DEFAULT_AUTH_URL.to_string()
}

fn default_registry_host() -> String {
    DEFAULT_REGISTRY_HOST.to_string()
}

fn default_docker_path() -> String {
    DEFAULT_DOCKER_PATH.to_string()
}

fn current_version() -> String {
    format!("v{}", env!("CARGO_PKG_VERSION"))
}

fn host_runtime() -> String {
    format!("{} ({})", os_info::get(), std::env::consts::ARCH)
}

/// Reads and writes the single [`GlobalSettings`] record of this machine.
pub struct GlobalSettingsStore {
    path: PathBuf,
}

impl GlobalSettingsStore {
    pub const HOME_ENV: &'static str = "KONAN_HOME";
    pub const DIR_NAME: &'static str = ".konan";
    pub const FILE_NAME: &'static str = "config.json";

    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// `$KONAN_HOME/config.json`, falling back to `~/.konan/config.json`.
    pub fn at_default_location() -> Result<Self> {
        if let Some(home) = std::env::var_os(Self::HOME_ENV) {
            return Ok(Self::new(PathBuf::from(home).join(Self::FILE_NAME)));
        }

        let home = dirs::home_dir()
            .ok_or_else(|| KonanError::Config("Could not find home directory".to_string()))?;
        Ok(Self::new(home.join(Self::DIR_NAME).join(Self::FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Fails with `NotFound` when the file has never been written.
    pub fn load(&self) -> Result<GlobalSettings> {
        let mut settings: GlobalSettings = read_json(&self.path)?;
        settings.refresh_derived();
        tracing::debug!(path = ?self.path, "loaded global settings");
        Ok(settings)
    }

    pub fn save(&self, settings: &GlobalSettings) -> Result<()> {
        write_json(&self.path, settings)?;
        tracing::debug!(path = ?self.path, "saved global settings");
        Ok(())
    }

    /// Loads the record, creating and persisting defaults on first run.
    pub fn load_or_init(&self) -> Result<GlobalSettings> {
        if self.exists() {
            return self.load();
        }

        let settings = GlobalSettings::default();
        self.save(&settings)?;
        tracing::info!(path = ?self.path, "created default global settings");
        Ok(settings)
    }
}
