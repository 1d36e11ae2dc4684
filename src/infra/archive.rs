//! Archive extraction
//!
//! Extracts gzipped tarballs into a destination directory, optionally
//! discarding leading path components. SDK distributions ship with a single
//! versioned top-level directory; stripping one component installs the SDK
//! directly at the layer root.

use std::fs::File;
use std::path::{Component, Path, PathBuf};

use flate2::read::GzDecoder;
use tar::Archive;
use tracing::debug;

use crate::error::ExtractError;

/// Extract a `.tar.gz` archive into `dest`, dropping the first
/// `strip_components` path components of every entry.
///
/// Entries whose paths vanish entirely after stripping (such as the
/// top-level directory itself) are skipped. Entry modes are preserved.
pub fn extract_tar_gz(
    archive_path: &Path,
    dest: &Path,
    strip_components: usize,
) -> Result<(), ExtractError> {
    debug!(archive = %archive_path.display(), dest = %dest.display(), strip_components, "extracting");

    let file = File::open(archive_path).map_err(|e| ExtractError::Archive {
        path: archive_path.to_path_buf(),
        error: e.to_string(),
    })?;
    let mut archive = Archive::new(GzDecoder::new(file));
    archive.set_preserve_permissions(true);

    let entries = archive.entries().map_err(|e| ExtractError::Archive {
        path: archive_path.to_path_buf(),
        error: e.to_string(),
    })?;

    for entry in entries {
        let mut entry = entry.map_err(|e| ExtractError::Archive {
            path: archive_path.to_path_buf(),
            error: e.to_string(),
        })?;

        let entry_path = entry.path().map_err(|e| ExtractError::Archive {
            path: archive_path.to_path_buf(),
            error: e.to_string(),
        })?;

        let Some(stripped) = strip_path(&entry_path, strip_components) else {
            continue;
        };

        let target = dest.join(&stripped);
        // Distribution archives do not always carry explicit directory
        // entries for every parent.
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ExtractError::IoError {
                path: parent.to_path_buf(),
                error: e.to_string(),
            })?;
        }
        entry.unpack(&target).map_err(|e| ExtractError::IoError {
            path: target.clone(),
            error: e.to_string(),
        })?;
    }

    Ok(())
}

/// Drop the first `strip` normal components of a path.
///
/// Returns `None` when nothing remains. Non-normal components (`..`, roots)
/// are discarded outright so entries cannot escape the destination.
fn strip_path(path: &Path, strip: usize) -> Option<PathBuf> {
    let stripped: PathBuf = path
        .components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .skip(strip)
        .collect();

    if stripped.as_os_str().is_empty() {
        None
    } else {
        Some(stripped)
    }
}
