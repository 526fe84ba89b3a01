use crate::error::AuthError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginRequest {
    Password { email: String, password: String },
    ApiKey(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub organization_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryCredentials {
    pub username: String,
    pub password: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl From<ApiError> for AuthError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized => AuthError::InvalidCredentials,
            ApiError::Status { status, body } => AuthError::Api {
                status,
                message: body,
            },
            ApiError::Transport(msg) => AuthError::Transport(msg),
            ApiError::Decode(msg) => AuthError::Api {
                status: 200,
                message: msg,
            },
        }
    }
}

/// The platform's authentication and registry-token API.
#[async_trait]
pub trait PlatformApi: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> Result<Session, ApiError>;

    /// Exchanges a refresh token for a new access token.
    async fn refresh_access_token(&self, refresh_token: &str) -> Result<String, ApiError>;

    async fn registry_credentials(&self, access_token: &str)
        -> Result<RegistryCredentials, ApiError>;
}
