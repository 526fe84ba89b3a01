use domain::{KonanError, Result};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Recursively copies `source` onto `destination`, replacing files that
/// already exist there. Returns the number of files copied.
pub fn overlay_dir(source: &Path, destination: &Path) -> Result<usize> {
    fs::create_dir_all(destination)?;

    let mut copied = 0;
    for entry in WalkDir::new(source).min_depth(1).follow_links(true) {
        let entry = entry.map_err(std::io::Error::from)?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| KonanError::Config(format!("{:?} escapes {:?}: {}", entry.path(), source, e)))?;
        let target = destination.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }

    tracing::debug!(?source, ?destination, copied, "overlaid directory");
    Ok(copied)
}
