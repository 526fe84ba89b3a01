use async_trait::async_trait;
use domain::ports::platform_api::{
    ApiError, LoginRequest, PlatformApi, RegistryCredentials, Session,
};
use domain::{KonanError, Result};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use url::Url;

pub const LOGIN_PATH: &str = "/api/auth/login/";
pub const API_KEY_LOGIN_PATH: &str = "/api/auth/api-key/login/";
pub const USER_PATH: &str = "/api/auth/user/";
pub const TOKEN_REFRESH_PATH: &str = "/api/auth/token/refresh/";
pub const REGISTRY_TOKEN_PATH: &str = "/registry/token/";

#[derive(Deserialize)]
struct TokenPair {
    access: String,
    refresh: String,
}

#[derive(Deserialize)]
struct RefreshedToken {
    access: String,
}

#[derive(Deserialize)]
struct UserProfile {
    #[serde(default)]
    organization_id: Option<String>,
}

#[derive(Deserialize)]
struct RegistryToken {
    token_name: String,
    token_password: String,
}

/// `PlatformApi` over HTTPS with bearer authentication.
pub struct HttpPlatformClient {
    client: Client,
    api_url: Url,
    auth_url: Url,
}

impl HttpPlatformClient {
    pub fn new(api_url: &str, auth_url: &str) -> Result<Self> {
        let parse = |raw: &str| {
            Url::parse(raw).map_err(|e| KonanError::Config(format!("invalid URL '{}': {}", raw, e)))
        };

        let client = Client::builder()
            .user_agent(concat!("konan-cli/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| KonanError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_url: parse(api_url)?,
            auth_url: parse(auth_url)?,
        })
    }

    fn endpoint(base: &Url, path: &str) -> Result<Url, ApiError> {
        base.join(path)
            .map_err(|e| ApiError::Transport(format!("invalid endpoint {}: {}", path, e)))
    }
}

fn transport(err: reqwest::Error) -> ApiError {
    ApiError::Transport(err.to_string())
}

/// Maps 401 to `Unauthorized`, other failures to `Status`, and decodes success bodies.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED {
        return Err(ApiError::Unauthorized);
    }
    if !status.is_success() {
        let body = response.text().await.map_err(transport)?;
        return Err(ApiError::Status {
            status: status.as_u16(),
            body,
        });
    }

    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}

#[async_trait]
impl PlatformApi for HttpPlatformClient {
    async fn login(&self, request: &LoginRequest) -> Result<Session, ApiError> {
        let response = match request {
            LoginRequest::Password { email, password } => {
                self.client
                    .post(Self::endpoint(&self.auth_url, LOGIN_PATH)?)
                    .json(&json!({ "email": email, "password": password }))
                    .send()
                    .await
            }
            LoginRequest::ApiKey(api_key) => {
                self.client
                    .post(Self::endpoint(&self.auth_url, API_KEY_LOGIN_PATH)?)
                    .json(&json!({ "api_key": api_key }))
                    .send()
                    .await
            }
        }
        .map_err(transport)?;
        let tokens: TokenPair = decode(response).await?;

        let response = self
            .client
            .get(Self::endpoint(&self.auth_url, USER_PATH)?)
            .bearer_auth(&tokens.access)
            .send()
            .await
            .map_err(transport)?;
        let profile: UserProfile = decode(response).await?;

        tracing::debug!(organization = ?profile.organization_id, "authenticated with platform");
        Ok(Session {
            access_token: tokens.access,
            refresh_token: tokens.refresh,
            organization_id: profile.organization_id,
        })
    }

    async fn refresh_access_token(&self, refresh_token: &str) -> Result<String, ApiError> {
        let response = self
            .client
            .post(Self::endpoint(&self.auth_url, TOKEN_REFRESH_PATH)?)
            .json(&json!({ "refresh": refresh_token }))
            .send()
            .await
            .map_err(transport)?;
        let token: RefreshedToken = decode(response).await?;
        Ok(token.access)
    }

    async fn registry_credentials(
        &self,
        access_token: &str,
    ) -> Result<RegistryCredentials, ApiError> {
        let response = self
            .client
            .get(Self::endpoint(&self.api_url, REGISTRY_TOKEN_PATH)?)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(transport)?;
        let token: RegistryToken = decode(response).await?;
        Ok(RegistryCredentials {
            username: token.token_name,
            password: token.token_password,
        })
    }
}
