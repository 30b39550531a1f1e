//! Error taxonomy for the catalog pipeline.
//!
//! Every stage returns its own error type and all of them are terminal for
//! the run that raised them: the pipeline is re-invoked wholesale by its
//! caller rather than retrying substeps.

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Failures while materialising the local copy of the upstream tree.
#[derive(Debug, Error)]
pub enum AcquisitionError {
    #[error("failed to create clone directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to launch git: {0}")]
    Spawn(#[source] io::Error),

    #[error("git {operation} exited with {status}")]
    GitFailed {
        operation: &'static str,
        status: ExitStatus,
    },

    #[error("failed to remove upstream tree copy {path}: {source}")]
    RemoveTree {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Failures while querying the upstream hosting service for the latest
/// release tag. Fatal for the run; the version marker is never touched.
#[derive(Debug, Error)]
pub enum VersionQueryError {
    #[error("release query failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("release endpoint returned {0}")]
    Status(reqwest::StatusCode),
}

/// Unrecoverable I/O while walking a category subtree or reading a
/// documentation file. A malformed document is not an error; it yields a
/// partially- or fully-empty record instead.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("failed to walk {root}: {source}")]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("failed to read {path}: {source}")]
    ReadDoc {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Failures while writing the catalog artifacts or manipulating their
/// backups. On failure the prior artifact remains intact under its backup
/// name.
#[derive(Debug, Error)]
pub enum SerializationError {
    #[error("failed to encode {category} catalog: {source}")]
    Encode {
        category: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to back up {path}: {source}")]
    Backup {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to restore {path}: {source}")]
    Restore {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no backup found for {path}; nothing to restore")]
    MissingBackup { path: PathBuf },
}

/// The embedded artifact failed to deserialize. This should never occur in
/// a correctly built binary, since the artifact is generated and embedded at
/// build time.
#[derive(Debug, Error)]
#[error("embedded {category} catalog is corrupt: {source}")]
pub struct CatalogCorruptError {
    pub category: &'static str,
    #[source]
    pub source: serde_json::Error,
}

/// Umbrella error for one synchronisation run.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Acquisition(#[from] AcquisitionError),

    #[error(transparent)]
    VersionQuery(#[from] VersionQueryError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Serialization(#[from] SerializationError),
}
