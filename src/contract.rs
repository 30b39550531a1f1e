//! Capability contracts for the pipeline's external collaborators.
//!
//! The network-facing stages (release metadata, tree acquisition) and the
//! two documentation formats are specified as traits so the orchestration
//! layer can be driven by real clients in production and by `mockall`
//! doubles in tests.

use std::path::Path;

use async_trait::async_trait;
#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

use crate::catalog::Plugin;
use crate::errors::{AcquisitionError, ExtractionError, VersionQueryError};

/// Queries the upstream hosting service for the most recent stable release.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait ReleaseSource: Send + Sync {
    /// Tag of the latest stable release, e.g. `v1.30.0`.
    async fn latest_tag(&self) -> Result<String, VersionQueryError>;
}

/// Materialises a local copy of the upstream documentation tree.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait TreeSource: Send + Sync {
    /// Ensure a usable copy of the upstream tree exists at `dest`.
    ///
    /// An existing directory is trusted as-is: no network operation, no
    /// integrity check, no update-in-place.
    async fn ensure_tree(&self, dest: &Path) -> Result<(), AcquisitionError>;
}

/// One of the two upstream documentation formats.
///
/// The walk logic is shared; only the file name being matched and the way a
/// matched file is turned into a [`Plugin`] differ between strategies. The
/// two strategies are never mixed within one run.
pub trait DocumentParser {
    /// File name that identifies a plugin's documentation in this format.
    fn doc_file_name(&self) -> &'static str;

    /// Parse one documentation file into a plugin record.
    ///
    /// A malformed or incomplete document is not an error; it yields a
    /// record with empty description and/or sample config.
    fn parse(&self, plugin_name: &str, doc_path: &Path) -> Result<Plugin, ExtractionError>;
}
