//! Catalog serialization with a two-phase backup transaction.
//!
//! Generation renames the prior artifact aside (`<file>.bak`) before
//! writing the new one, so a failed write never corrupts the prior state
//! and a later clean run can roll the whole generation back.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::catalog::{Category, Plugin};
use crate::errors::SerializationError;

/// Backup location for a live artifact: `inputs.json` -> `inputs.json.bak`.
pub fn backup_path(live: &Path) -> PathBuf {
    let mut name = OsString::from(live.as_os_str());
    name.push(".bak");
    PathBuf::from(name)
}

/// Renames the live file aside before a new one is written.
///
/// Returns whether a backup was taken; the first-ever generation has
/// nothing to back up. A rename (never copy-then-delete) keeps the step
/// atomic on the same filesystem.
pub fn stage_backup(live: &Path) -> Result<bool, SerializationError> {
    if !live.exists() {
        return Ok(false);
    }
    let backup = backup_path(live);
    fs::rename(live, &backup).map_err(|source| SerializationError::Backup {
        path: live.to_path_buf(),
        source,
    })?;
    debug!(path = %live.display(), backup = %backup.display(), "staged backup");
    Ok(true)
}

/// Removes the live file and renames its backup back into place.
fn restore_backup(live: &Path) -> Result<(), SerializationError> {
    let backup = backup_path(live);
    if !backup.exists() {
        return Err(SerializationError::MissingBackup {
            path: live.to_path_buf(),
        });
    }
    if live.exists() {
        fs::remove_file(live).map_err(|source| SerializationError::Restore {
            path: live.to_path_buf(),
            source,
        })?;
    }
    fs::rename(&backup, live).map_err(|source| SerializationError::Restore {
        path: live.to_path_buf(),
        source,
    })?;
    debug!(path = %live.display(), "restored from backup");
    Ok(())
}

/// Writes every category partition under `output_dir`, backing each prior
/// partition up first.
///
/// Callers extract all categories before invoking this, so a failed
/// extraction never produces a partial catalog on disk.
pub fn write_catalog(
    output_dir: &Path,
    catalog: &[(Category, Vec<Plugin>)],
) -> Result<(), SerializationError> {
    fs::create_dir_all(output_dir).map_err(|source| SerializationError::Write {
        path: output_dir.to_path_buf(),
        source,
    })?;

    for (category, plugins) in catalog {
        let live = output_dir.join(category.artifact_file());
        stage_backup(&live)?;

        let mut body = serde_json::to_string_pretty(plugins).map_err(|source| {
            SerializationError::Encode {
                category: category.as_str(),
                source,
            }
        })?;
        body.push('\n');

        fs::write(&live, body).map_err(|source| SerializationError::Write {
            path: live.to_path_buf(),
            source,
        })?;
        info!(
            category = %category,
            count = plugins.len(),
            path = %live.display(),
            "wrote catalog partition"
        );
    }
    Ok(())
}

/// Clean mode: rolls the most recent generation back.
///
/// Every category partition is restored from its backup (missing backups
/// are an error: there is nothing to restore to). The version marker is
/// restored leniently: if it had no backup the marker is removed, returning
/// the gate to its unset state so the next sync runs again.
pub fn clean(output_dir: &Path, marker_path: &Path) -> Result<(), SerializationError> {
    for category in Category::ALL {
        let live = output_dir.join(category.artifact_file());
        restore_backup(&live)?;
        info!(category = %category, path = %live.display(), "restored catalog partition");
    }

    if backup_path(marker_path).exists() {
        restore_backup(marker_path)?;
        info!(path = %marker_path.display(), "restored version marker");
    } else if marker_path.exists() {
        warn!(
            path = %marker_path.display(),
            "no marker backup; removing marker so the next sync re-runs"
        );
        fs::remove_file(marker_path).map_err(|source| SerializationError::Restore {
            path: marker_path.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}
