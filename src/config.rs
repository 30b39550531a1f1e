//! In-memory configuration for a sync run.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub const DEFAULT_REPO_URL: &str = "https://github.com/influxdata/telegraf";
pub const DEFAULT_RELEASES_URL: &str =
    "https://api.github.com/repos/influxdata/telegraf/releases/latest";
pub const DEFAULT_TREE_DIR: &str = "telegraf";
pub const DEFAULT_OUTPUT_DIR: &str = "sampleconfigs";

/// File under the output directory holding the last-synced release tag.
pub const MARKER_FILE: &str = "buildversion.txt";

/// Which upstream documentation format drives the extractor. The two
/// formats are never mixed within one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceFormat {
    /// Standalone `sample.conf` fragment next to each plugin.
    SampleConf,
    /// `README.md` with a fenced `toml` block under "Configuration".
    Readme,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    pub repo_url: String,
    pub releases_url: String,
    /// Disposable local copy of the upstream tree.
    pub tree_dir: PathBuf,
    /// Where the catalog partitions and the version marker live.
    pub output_dir: PathBuf,
    pub format: SourceFormat,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            repo_url: DEFAULT_REPO_URL.to_string(),
            releases_url: DEFAULT_RELEASES_URL.to_string(),
            tree_dir: PathBuf::from(DEFAULT_TREE_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            format: SourceFormat::SampleConf,
        }
    }
}

impl SyncConfig {
    pub fn marker_path(&self) -> PathBuf {
        self.output_dir.join(MARKER_FILE)
    }

    pub fn trace_loaded(&self) {
        info!(
            repo_url = %self.repo_url,
            tree_dir = %self.tree_dir.display(),
            output_dir = %self.output_dir.display(),
            format = ?self.format,
            "Loaded SyncConfig"
        );
        debug!(?self, "SyncConfig loaded (full debug)");
    }
}
