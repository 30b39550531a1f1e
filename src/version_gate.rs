//! Decides whether a sync run needs to do any work at all.
//!
//! The marker file holds the last-synced release tag. On mismatch the new
//! tag is persisted *before* extraction starts: a permanently broken
//! extraction then skips on the next run instead of retrying forever, at
//! the cost of missing one catalog update if the run fails midway. The old
//! marker is staged aside first so clean mode can restore it.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::errors::SerializationError;
use crate::serialize::stage_backup;

/// Outcome of comparing the latest upstream tag against the local marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Marker matches the latest tag; no extraction or serialization runs.
    UpToDate,
    /// New tag persisted; the pipeline proceeds.
    Proceed,
}

/// Reads the persisted marker, trimmed of surrounding whitespace.
///
/// An unreadable or absent marker (e.g. the first-ever run) means "unset":
/// the pipeline proceeds as if the tags mismatched.
pub fn read_marker(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(raw) => Some(raw.trim().to_string()),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "version marker not readable, treating as unset");
            None
        }
    }
}

/// Compares `latest` against the marker at `marker_path` and, on mismatch,
/// immediately persists `latest` as the new marker.
pub fn check_and_update(latest: &str, marker_path: &Path) -> Result<Gate, SerializationError> {
    if read_marker(marker_path).as_deref() == Some(latest) {
        info!(tag = latest, "catalog already matches the latest upstream release");
        return Ok(Gate::UpToDate);
    }

    if let Some(parent) = marker_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| SerializationError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    stage_backup(marker_path)?;
    fs::write(marker_path, latest).map_err(|source| SerializationError::Write {
        path: marker_path.to_path_buf(),
        source,
    })?;
    info!(tag = latest, path = %marker_path.display(), "persisted new version marker");
    Ok(Gate::Proceed)
}
