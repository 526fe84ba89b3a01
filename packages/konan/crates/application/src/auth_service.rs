use domain::ports::platform_api::{ApiError, LoginRequest, RegistryCredentials};
use domain::{AuthError, GlobalSettings, GlobalSettingsStore, Interaction, PlatformApi, Result};

/// Bounds the registry credential request: one attempt, then at most one
/// refresh-and-retry after a 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshPolicy {
    FirstAttempt,
    Refreshed,
}

impl RefreshPolicy {
    /// The state to retry in after a 401, or `None` once the retry is spent.
    pub fn after_unauthorized(self) -> Option<Self> {
        match self {
            RefreshPolicy::FirstAttempt => Some(RefreshPolicy::Refreshed),
            RefreshPolicy::Refreshed => None,
        }
    }
}

/// Session handling against the platform. Every token change is persisted
/// through the store before the call returns.
pub struct AuthService<'a> {
    api: &'a dyn PlatformApi,
    store: &'a GlobalSettingsStore,
}

impl<'a> AuthService<'a> {
    pub fn new(api: &'a dyn PlatformApi, store: &'a GlobalSettingsStore) -> Self {
        Self { api, store }
    }

    pub async fn login(&self, settings: &mut GlobalSettings, request: LoginRequest) -> Result<()> {
        let session = self.api.login(&request).await.map_err(AuthError::from)?;

        settings.access_token = Some(session.access_token);
        settings.refresh_token = Some(session.refresh_token);
        settings.organization_id = session.organization_id;
        if let LoginRequest::ApiKey(key) = request {
            settings.api_key = Some(key);
        }
        // Registry credentials belong to the previous session.
        settings.registry_token_name = None;
        settings.registry_token_password = None;

        self.store.save(settings)?;
        tracing::info!(organization = ?settings.organization_id, "logged in");
        Ok(())
    }

    /// Logs in interactively when no access token is stored. A stored API key
    /// is used before asking for an email and password.
    pub async fn ensure_logged_in(
        &self,
        settings: &mut GlobalSettings,
        ui: &dyn Interaction,
    ) -> Result<()> {
        if settings.is_logged_in() {
            return Ok(());
        }

        let request = match settings.api_key.clone() {
            Some(key) => LoginRequest::ApiKey(key),
            None => {
                ui.info("You need to log in to continue.");
                LoginRequest::Password {
                    email: ui.input("Email", None)?,
                    password: ui.secret("Password")?,
                }
            }
        };

        self.login(settings, request).await?;
        ui.success("Logged in");
        Ok(())
    }

    /// Returns registry credentials, from the cache when present.
    pub async fn registry_credentials(
        &self,
        settings: &mut GlobalSettings,
    ) -> Result<RegistryCredentials> {
        if let Some(cached) = settings.registry_credentials() {
            return Ok(cached);
        }

        let mut policy = RefreshPolicy::FirstAttempt;
        loop {
            let access_token = settings.access_token.clone().ok_or(AuthError::NotLoggedIn)?;

            match self.api.registry_credentials(&access_token).await {
                Ok(credentials) => {
                    settings.set_registry_credentials(&credentials);
                    self.store.save(settings)?;
                    return Ok(credentials);
                }
                Err(ApiError::Unauthorized) => {
                    policy = policy
                        .after_unauthorized()
                        .ok_or(AuthError::SessionExpired)?;
                    tracing::info!("access token rejected, refreshing");
                    self.refresh(settings).await?;
                }
                Err(e) => return Err(AuthError::from(e).into()),
            }
        }
    }

    async fn refresh(&self, settings: &mut GlobalSettings) -> Result<()> {
        let refresh_token = settings
            .refresh_token
            .clone()
            .ok_or(AuthError::SessionExpired)?;

        match self.api.refresh_access_token(&refresh_token).await {
            Ok(access_token) => {
                settings.access_token = Some(access_token);
                self.store.save(settings)?;
                Ok(())
            }
            Err(ApiError::Unauthorized) => Err(AuthError::SessionExpired.into()),
            Err(e) => Err(AuthError::from(e).into()),
        }
    }
}
