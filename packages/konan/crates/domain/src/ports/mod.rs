pub mod container_engine;
pub mod interaction;
pub mod platform_api;
