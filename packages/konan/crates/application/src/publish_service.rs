use crate::auth_service::AuthService;
use domain::entities::registry_target;
use domain::{
    AuthError, ContainerEngine, GlobalSettings, GlobalSettingsStore, Interaction, KonanError,
    PlatformApi, ProjectSettings, Result,
};

pub struct PublishService<'a> {
    engine: &'a dyn ContainerEngine,
    api: &'a dyn PlatformApi,
    ui: &'a dyn Interaction,
    store: &'a GlobalSettingsStore,
}

impl<'a> PublishService<'a> {
    pub fn new(
        engine: &'a dyn ContainerEngine,
        api: &'a dyn PlatformApi,
        ui: &'a dyn Interaction,
        store: &'a GlobalSettingsStore,
    ) -> Self {
        Self {
            engine,
            api,
            ui,
            store,
        }
    }

    /// Picks the local image to publish: the explicit tag, else the project's
    /// latest build once confirmed, else whatever the user types.
    pub async fn resolve_image(
        &self,
        explicit_tag: Option<&str>,
        project: Option<&ProjectSettings>,
    ) -> Result<String> {
        let latest = project.and_then(|p| p.latest_built_image.as_deref());

        let tag = match (explicit_tag, latest) {
            (Some(tag), _) => tag.to_string(),
            (None, Some(latest))
                if self
                    .ui
                    .confirm(&format!("Publish the latest built image {}?", latest), true)? =>
            {
                latest.to_string()
            }
            _ => self.ui.input("Image to publish", None)?,
        };

        let tag = tag.trim().to_string();
        if tag.is_empty() {
            return Err(KonanError::Precondition(
                "No image was selected for publishing.".to_string(),
            ));
        }
        if !self.engine.image_exists(&tag).await? {
            return Err(KonanError::ImageNotFound(tag));
        }
        Ok(tag)
    }

    /// Pushes the resolved image to the organization's repository and returns
    /// the remote reference.
    pub async fn publish(
        &self,
        settings: &mut GlobalSettings,
        project: Option<&ProjectSettings>,
        explicit_tag: Option<&str>,
    ) -> Result<String> {
        let image = self.resolve_image(explicit_tag, project).await?;

        let auth = AuthService::new(self.api, self.store);
        auth.ensure_logged_in(settings, self.ui).await?;
        let organization = settings
            .organization_id
            .clone()
            .ok_or(AuthError::MissingOrganization)?;

        self.ui.step("Fetching registry credentials...");
        let credentials = auth.registry_credentials(settings).await?;
        self.engine
            .login(&settings.registry_host, &credentials)
            .await?;

        let target = registry_target(&settings.registry_host, &organization, &image);
        self.engine.tag_image(&image, &target).await?;
        tracing::info!(source = %image, %target, "tagged image");

        self.ui.step(&format!("Pushing {}...", target));
        let ui = self.ui;
        let mut echo = |chunk: &str| ui.stream(chunk);
        self.engine.push(&target, &mut echo).await?;

        self.ui.success(&format!("Published {}", target));
        Ok(target)
    }
}
