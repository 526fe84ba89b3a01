use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = KonanError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum KonanError {
    #[error("No settings found at {0:?}")]
    NotFound(PathBuf),

    #[error("A konan project already exists at {0:?}")]
    AlreadyInitialized(PathBuf),

    #[error("{0}")]
    Precondition(String),

    #[error("Image build failed: {0}")]
    Build(String),

    #[error("Image '{0}' does not exist locally")]
    ImageNotFound(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("{endpoint} responded with HTTP {status}")]
    ProbeFailure { endpoint: String, status: u16 },

    #[error("Smoke test aborted: {0}")]
    SmokeTest(String),

    #[error("Container engine error: {0}")]
    Engine(String),

    #[error("Invalid settings file {path:?}")]
    InvalidSettings {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid image reference '{0}'")]
    InvalidImageReference(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Operation cancelled by user")]
    Cancelled,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("You are not logged in")]
    NotLoggedIn,

    #[error("The platform rejected the supplied credentials")]
    InvalidCredentials,

    #[error("Your session has expired, please log in again")]
    SessionExpired,

    #[error("No organization is associated with this account")]
    MissingOrganization,

    #[error("Platform API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Could not reach the platform: {0}")]
    Transport(String),
}

impl KonanError {
    /// Returns an actionable next step for the user, when one exists.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            KonanError::NotFound(_) => Some("Run `konan init` to create a project first."),
            KonanError::AlreadyInitialized(_) => {
                Some("Pass --override to regenerate the template files.")
            }
            KonanError::ImageNotFound(_) => {
                Some("Run `konan build --image-name <name>` or pass an existing --image-tag.")
            }
            KonanError::Auth(AuthError::SessionExpired | AuthError::NotLoggedIn) => {
                Some("Run `konan login` and try again.")
            }
            KonanError::InvalidSettings { .. } => {
                Some("Fix or delete the settings file; unknown fields are rejected.")
            }
            KonanError::Engine(_) => Some("Check that docker is installed and running."),
            _ => None,
        }
    }
}
