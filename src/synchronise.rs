//! High-level pipeline: version gate → acquire → extract → serialize.
//!
//! Single-threaded and run-to-completion: each stage fully completes before
//! the next begins, every failure propagates upward immediately, and no
//! partial catalog is ever serialized (all four categories are extracted
//! before any partition is written). The disposable upstream tree copy is
//! removed at the end of the run on both the success and failure paths.

use tracing::{error, info};

use crate::acquire;
use crate::catalog::{Category, Plugin};
use crate::config::{SourceFormat, SyncConfig};
use crate::contract::{DocumentParser, ReleaseSource, TreeSource};
use crate::errors::{ExtractionError, SyncError};
use crate::extract::{extract_category, ReadmeParser, SampleConfParser};
use crate::serialize;
use crate::version_gate::{check_and_update, Gate};

/// What one run accomplished, for the operator summary.
#[derive(Debug)]
pub enum SyncReport {
    /// The marker already matched the latest upstream tag; nothing ran.
    UpToDate { tag: String },
    /// A full extraction and serialization, with per-category record counts.
    Synced {
        tag: String,
        counts: Vec<(Category, usize)>,
    },
}

/// Runs one synchronisation to completion.
pub async fn synchronise<R, T>(
    config: &SyncConfig,
    releases: &R,
    tree: &T,
) -> Result<SyncReport, SyncError>
where
    R: ReleaseSource,
    T: TreeSource,
{
    info!("starting catalog synchronisation");

    let latest = releases.latest_tag().await?;
    match check_and_update(&latest, &config.marker_path())? {
        Gate::UpToDate => return Ok(SyncReport::UpToDate { tag: latest }),
        Gate::Proceed => {}
    }

    tree.ensure_tree(&config.tree_dir).await?;

    // The tree copy is owned by this run alone; drop it whether or not
    // extraction and serialization succeeded.
    let outcome = extract_and_write(config);
    if let Err(e) = acquire::remove_tree(&config.tree_dir) {
        error!(error = %e, "failed to remove upstream tree copy");
        if outcome.is_ok() {
            return Err(e.into());
        }
    }

    let counts = outcome?;
    info!(tag = %latest, "catalog synchronisation complete");
    Ok(SyncReport::Synced {
        tag: latest,
        counts,
    })
}

fn extract_and_write(config: &SyncConfig) -> Result<Vec<(Category, usize)>, SyncError> {
    let catalog = match config.format {
        SourceFormat::SampleConf => extract_all(config, &SampleConfParser)?,
        SourceFormat::Readme => extract_all(config, &ReadmeParser)?,
    };
    serialize::write_catalog(&config.output_dir, &catalog)?;
    Ok(catalog
        .iter()
        .map(|(category, plugins)| (*category, plugins.len()))
        .collect())
}

fn extract_all<P>(
    config: &SyncConfig,
    parser: &P,
) -> Result<Vec<(Category, Vec<Plugin>)>, ExtractionError>
where
    P: DocumentParser,
{
    let mut catalog = Vec::new();
    for category in Category::ALL {
        let root = config.tree_dir.join(category.subtree());
        let plugins = extract_category(&root, parser)?;
        catalog.push((category, plugins));
    }
    Ok(catalog)
}
