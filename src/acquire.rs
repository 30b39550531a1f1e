//! Source acquisition: a disposable local clone of the upstream tree.

use std::fs;
use std::path::Path;
use std::process::Command;

use async_trait::async_trait;
use tracing::{debug, error, info};

use crate::contract::TreeSource;
use crate::errors::AcquisitionError;

/// [`TreeSource`] that shells out to `git clone`.
///
/// Clone progress is inherited by the child process, so the operator sees
/// it on the terminal during the (large) initial clone.
pub struct GitTreeSource {
    repo_url: String,
}

impl GitTreeSource {
    pub fn new(repo_url: impl Into<String>) -> Self {
        Self {
            repo_url: repo_url.into(),
        }
    }
}

#[async_trait]
impl TreeSource for GitTreeSource {
    async fn ensure_tree(&self, dest: &Path) -> Result<(), AcquisitionError> {
        if dest.exists() {
            // An existing copy is trusted as-is. This also tolerates a tree
            // left behind by an interrupted run.
            info!(path = %dest.display(), "reusing existing upstream tree copy");
            return Ok(());
        }

        fs::create_dir_all(dest).map_err(|source| AcquisitionError::CreateDir {
            path: dest.to_path_buf(),
            source,
        })?;

        info!(
            repo_url = %self.repo_url,
            path = %dest.display(),
            "cloning upstream repository"
        );
        let status = Command::new("git")
            .arg("clone")
            .arg(&self.repo_url)
            .arg(dest)
            .status()
            .map_err(AcquisitionError::Spawn)?;

        if !status.success() {
            error!(
                repo_url = %self.repo_url,
                path = %dest.display(),
                "git clone exited with non-zero code: {}",
                status
            );
            return Err(AcquisitionError::GitFailed {
                operation: "clone",
                status,
            });
        }

        info!(path = %dest.display(), "clone complete");
        Ok(())
    }
}

/// Removes the disposable tree copy at the end of a run.
///
/// The tree is owned solely by the pipeline for the duration of one run and
/// is removed on both the success and failure paths.
pub fn remove_tree(dest: &Path) -> Result<(), AcquisitionError> {
    if !dest.exists() {
        debug!(path = %dest.display(), "no tree copy to remove");
        return Ok(());
    }
    fs::remove_dir_all(dest).map_err(|source| AcquisitionError::RemoveTree {
        path: dest.to_path_buf(),
        source,
    })?;
    info!(path = %dest.display(), "removed upstream tree copy");
    Ok(())
}
