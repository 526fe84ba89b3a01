pub mod docker;
pub mod platform;
