//! Loads the optional YAML config file and merges it over the defaults.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{error, info};

use crate::config::{SourceFormat, SyncConfig};

#[derive(Debug, Default, Deserialize)]
struct StaticConfig {
    #[serde(default)]
    upstream: UpstreamSection,
    #[serde(default)]
    catalog: CatalogSection,
    #[serde(default)]
    extract: ExtractSection,
}

#[derive(Debug, Default, Deserialize)]
struct UpstreamSection {
    repo_url: Option<String>,
    releases_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct CatalogSection {
    tree_dir: Option<std::path::PathBuf>,
    output_dir: Option<std::path::PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct ExtractSection {
    format: Option<String>,
}

/// Loads the YAML config at `path`, or the built-in defaults when no file
/// was given. Every field is optional; defaults fill the gaps.
pub fn load_config(path: Option<&Path>) -> Result<SyncConfig> {
    let static_conf = match path {
        None => {
            info!("no config file given, using defaults");
            StaticConfig::default()
        }
        Some(path) => {
            info!(config_path = ?path, "Loading configuration from file");
            let content = fs::read_to_string(path).with_context(|| {
                error!(config_path = ?path, "Failed to read config file");
                format!("Failed to read config file {path:?}")
            })?;
            serde_yaml::from_str(&content).with_context(|| {
                error!(config_path = ?path, "Failed to parse config YAML");
                "Failed to parse config YAML".to_string()
            })?
        }
    };

    let defaults = SyncConfig::default();
    let format = match static_conf.extract.format.as_deref() {
        None => defaults.format,
        Some("sample-conf") | Some("sampleconf") | Some("sample_conf") => SourceFormat::SampleConf,
        Some("readme") => SourceFormat::Readme,
        Some(other) => {
            error!(format = %other, "Unsupported extract.format in config");
            anyhow::bail!("Unsupported extract.format: {}", other);
        }
    };

    let config = SyncConfig {
        repo_url: static_conf.upstream.repo_url.unwrap_or(defaults.repo_url),
        releases_url: static_conf
            .upstream
            .releases_url
            .unwrap_or(defaults.releases_url),
        tree_dir: static_conf.catalog.tree_dir.unwrap_or(defaults.tree_dir),
        output_dir: static_conf
            .catalog
            .output_dir
            .unwrap_or(defaults.output_dir),
        format,
    };
    config.trace_loaded();
    Ok(config)
}
