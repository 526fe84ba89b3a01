//! Workflows behind the konan commands. Each service borrows its ports
//! (container engine, platform API, interaction) so it runs headless in tests.

pub mod auth_service;
pub mod build_service;
pub mod init_service;
pub mod publish_service;

pub use auth_service::{AuthService, RefreshPolicy};
pub use build_service::{build_context, BuildOutcome, BuildRequest, BuildService};
pub use init_service::{init_project, InitOptions};
pub use publish_service::PublishService;
pub use smoke_test::{SmokeTestConfig, SmokeTestRunner};
