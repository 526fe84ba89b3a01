#![allow(dead_code)]

use async_trait::async_trait;
use domain::ports::container_engine::{BuiltImage, ContainerHandle, LogSink, PortBinding};
use domain::ports::platform_api::{ApiError, LoginRequest, RegistryCredentials, Session};
use domain::{ContainerEngine, Interaction, KonanError, PlatformApi, Result};
use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Records every engine call as a short string such as `"push registry/org:churn"`.
#[derive(Default)]
pub struct FakeEngine {
    pub local_images: Vec<String>,
    pub build_log: Vec<String>,
    pub build_failure: Option<String>,
    pub version_probe_failure: Option<String>,
    pub start_failure: Option<String>,
    pub cleanup_failure: Option<String>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeEngine {
    pub fn with_images(images: &[&str]) -> Self {
        Self {
            local_images: images.iter().map(|i| i.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, operation: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.split(' ').next() == Some(operation))
            .count()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ContainerEngine for FakeEngine {
    async fn build_image(
        &self,
        context: &Path,
        tag: &str,
        logs: LogSink<'_>,
    ) -> Result<BuiltImage> {
        self.record(format!("build {} {}", tag, context.display()));
        for line in &self.build_log {
            logs(line.as_str());
        }
        if let Some(message) = &self.build_failure {
            return Err(KonanError::Build(message.clone()));
        }
        Ok(BuiltImage {
            id: "sha256:5eed".to_string(),
            tags: vec![tag.to_string()],
        })
    }

    async fn run_once(&self, image: &str, command: &[&str]) -> Result<String> {
        self.record(format!("run_once {} {}", image, command.join(" ")));
        match &self.version_probe_failure {
            Some(message) => Err(KonanError::Engine(message.clone())),
            None => Ok("Python 3.10.13".to_string()),
        }
    }

    async fn create_container(&self, image: &str, ports: PortBinding) -> Result<ContainerHandle> {
        self.record(format!("create {} {}:{}", image, ports.host, ports.container));
        Ok(ContainerHandle {
            id: "c0ffee".to_string(),
        })
    }

    async fn start_container(&self, container: &ContainerHandle) -> Result<()> {
        self.record(format!("start {}", container.id));
        match &self.start_failure {
            Some(message) => Err(KonanError::Engine(message.clone())),
            None => Ok(()),
        }
    }

    async fn stop_and_remove(&self, container: &ContainerHandle) -> Result<()> {
        self.record(format!("stop_and_remove {}", container.id));
        match &self.cleanup_failure {
            Some(message) => Err(KonanError::Engine(message.clone())),
            None => Ok(()),
        }
    }

    async fn container_logs(&self, container: &ContainerHandle, lines: usize) -> Result<String> {
        self.record(format!("logs {} {}", container.id, lines));
        Ok("Traceback (most recent call last):\nKeyError: 'some_feat'".to_string())
    }

    async fn image_exists(&self, reference: &str) -> Result<bool> {
        self.record(format!("image_exists {}", reference));
        Ok(self.local_images.iter().any(|i| i == reference))
    }

    async fn tag_image(&self, source: &str, target: &str) -> Result<()> {
        self.record(format!("tag {} {}", source, target));
        Ok(())
    }

    async fn login(&self, registry: &str, credentials: &RegistryCredentials) -> Result<()> {
        self.record(format!("login {} {}", registry, credentials.username));
        Ok(())
    }

    async fn push(&self, reference: &str, progress: LogSink<'_>) -> Result<()> {
        self.record(format!("push {}", reference));
        progress("5f70bf18a086: Pushed");
        progress("latest: digest: sha256:ab12 size: 1573");
        Ok(())
    }
}

/// Platform double answering registry token requests from a script.
pub struct FakeApi {
    pub session: Session,
    registry_responses: Mutex<VecDeque<std::result::Result<RegistryCredentials, ApiError>>>,
    refresh_response: std::result::Result<String, ApiError>,
    pub login_calls: AtomicUsize,
    pub refresh_calls: AtomicUsize,
    pub registry_calls: AtomicUsize,
    pub seen_tokens: Mutex<Vec<String>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self {
            session: Session {
                access_token: "access-1".to_string(),
                refresh_token: "refresh-1".to_string(),
                organization_id: Some("org-9".to_string()),
            },
            registry_responses: Mutex::new(VecDeque::new()),
            refresh_response: Ok("access-2".to_string()),
            login_calls: AtomicUsize::new(0),
            refresh_calls: AtomicUsize::new(0),
            registry_calls: AtomicUsize::new(0),
            seen_tokens: Mutex::new(Vec::new()),
        }
    }

    pub fn with_registry_responses(
        mut self,
        responses: Vec<std::result::Result<RegistryCredentials, ApiError>>,
    ) -> Self {
        self.registry_responses = Mutex::new(responses.into());
        self
    }

    pub fn with_refresh_response(mut self, response: std::result::Result<String, ApiError>) -> Self {
        self.refresh_response = response;
        self
    }

    pub fn logins(&self) -> usize {
        self.login_calls.load(Ordering::SeqCst)
    }

    pub fn refreshes(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    pub fn registry_requests(&self) -> usize {
        self.registry_calls.load(Ordering::SeqCst)
    }

    pub fn contacted(&self) -> bool {
        self.logins() + self.refreshes() + self.registry_requests() > 0
    }
}

pub fn credentials() -> RegistryCredentials {
    RegistryCredentials {
        username: "konan-pull".to_string(),
        password: "s3cret".to_string(),
    }
}

#[async_trait]
impl PlatformApi for FakeApi {
    async fn login(&self, _request: &LoginRequest) -> std::result::Result<Session, ApiError> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.session.clone())
    }

    async fn refresh_access_token(
        &self,
        _refresh_token: &str,
    ) -> std::result::Result<String, ApiError> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        self.refresh_response.clone()
    }

    async fn registry_credentials(
        &self,
        access_token: &str,
    ) -> std::result::Result<RegistryCredentials, ApiError> {
        self.registry_calls.fetch_add(1, Ordering::SeqCst);
        self.seen_tokens.lock().unwrap().push(access_token.to_string());
        self.registry_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(ApiError::Unauthorized))
    }
}

/// Answers prompts from queued replies and keeps everything it was told.
#[derive(Default)]
pub struct ScriptedUi {
    confirms: Mutex<VecDeque<bool>>,
    inputs: Mutex<VecDeque<String>>,
    messages: Mutex<Vec<String>>,
    streamed: Mutex<Vec<String>>,
}

impl ScriptedUi {
    pub fn with_confirms(self, answers: &[bool]) -> Self {
        self.confirms.lock().unwrap().extend(answers.iter().copied());
        self
    }

    pub fn with_inputs(self, answers: &[&str]) -> Self {
        self.inputs
            .lock()
            .unwrap()
            .extend(answers.iter().map(|a| a.to_string()));
        self
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    pub fn messages_at(&self, level: &str) -> Vec<String> {
        let prefix = format!("{}: ", level);
        self.messages()
            .into_iter()
            .filter_map(|m| m.strip_prefix(&prefix).map(str::to_string))
            .collect()
    }

    pub fn streamed(&self) -> Vec<String> {
        self.streamed.lock().unwrap().clone()
    }

    fn say(&self, level: &str, message: &str) {
        self.messages
            .lock()
            .unwrap()
            .push(format!("{}: {}", level, message));
    }

    fn next_input(&self) -> Result<String> {
        self.inputs
            .lock()
            .unwrap()
            .pop_front()
            .ok_or(KonanError::Cancelled)
    }
}

impl Interaction for ScriptedUi {
    fn confirm(&self, _prompt: &str, _default: bool) -> Result<bool> {
        self.confirms
            .lock()
            .unwrap()
            .pop_front()
            .ok_or(KonanError::Cancelled)
    }

    fn input(&self, _prompt: &str, _default: Option<&str>) -> Result<String> {
        self.next_input()
    }

    fn secret(&self, _prompt: &str) -> Result<String> {
        self.next_input()
    }

    fn step(&self, message: &str) {
        self.say("step", message);
    }

    fn info(&self, message: &str) {
        self.say("info", message);
    }

    fn success(&self, message: &str) {
        self.say("success", message);
    }

    fn warn(&self, message: &str) {
        self.say("warn", message);
    }

    fn error(&self, message: &str) {
        self.say("error", message);
    }

    fn stream(&self, line: &str) {
        self.streamed.lock().unwrap().push(line.to_string());
    }
}
