use crate::error::{KonanError, Result};
use regex::Regex;
use std::sync::OnceLock;

static REFERENCE: OnceLock<Regex> = OnceLock::new();

// [registry[:port]/]name[/name...][:tag]
const REFERENCE_PATTERN: &str = r"^(?:[a-zA-Z0-9.-]+(?::[0-9]+)?/)?[a-z0-9]+(?:(?:[._]|__|-+)[a-z0-9]+)*(?:/[a-z0-9]+(?:(?:[._]|__|-+)[a-z0-9]+)*)*(?::[A-Za-z0-9_][A-Za-z0-9_.-]{0,127})?$";

fn reference_pattern() -> Result<&'static Regex> {
    if let Some(pattern) = REFERENCE.get() {
        return Ok(pattern);
    }
    let pattern = Regex::new(REFERENCE_PATTERN)
        .map_err(|e| KonanError::Config(format!("invalid image reference pattern: {}", e)))?;
    Ok(REFERENCE.get_or_init(|| pattern))
}

/// Rejects references the container engine would refuse to tag with.
pub fn validate_reference(reference: &str) -> Result<()> {
    if reference.len() <= 255 && reference_pattern()?.is_match(reference) {
        Ok(())
    } else {
        Err(KonanError::InvalidImageReference(reference.to_string()))
    }
}

/// Drops a trailing `:tag`, leaving a `:port` in the registry part alone.
pub fn strip_tag(reference: &str) -> &str {
    let name_start = reference.rfind('/').map(|i| i + 1).unwrap_or(0);
    match reference[name_start..].find(':') {
        Some(colon) => &reference[..name_start + colon],
        None => reference,
    }
}

/// The organization-scoped path an image is published under.
pub fn registry_target(registry_host: &str, organization_id: &str, local_reference: &str) -> String {
    let name = strip_tag(local_reference);
    let name = name.rsplit('/').next().unwrap_or(name);
    format!("{}/{}:{}", registry_host, organization_id, name)
}
