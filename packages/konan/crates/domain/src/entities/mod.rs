pub mod image;
pub mod language;
pub mod report;

pub use image::{registry_target, strip_tag, validate_reference};
pub use language::Language;
pub use report::{Probe, ProbeOutcome, ProbeResult, SmokeTestReport, TestState};
