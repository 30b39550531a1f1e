//! Catalog data model and the embedded-artifact accessors.
//!
//! The four `*_plugins` functions are the only runtime surface the rest of
//! the application needs: they deserialize the JSON partitions embedded at
//! build time, so the upstream tree is never required after a sync.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::errors::CatalogCorruptError;

/// One plugin's catalog entry, keyed by `name` within its category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plugin {
    /// Derived from the plugin's directory name; unique within a category.
    pub name: String,
    /// Single-line human summary. May be empty when the upstream
    /// documentation had no usable fragment.
    pub description: String,
    /// Multi-line configuration text, one trailing newline per line.
    pub sample_config: String,
}

/// The four independent plugin categories. No record crosses categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Inputs,
    Outputs,
    Processors,
    Aggregators,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Inputs,
        Category::Outputs,
        Category::Processors,
        Category::Aggregators,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Inputs => "inputs",
            Category::Outputs => "outputs",
            Category::Processors => "processors",
            Category::Aggregators => "aggregators",
        }
    }

    /// Upstream subtree holding this category's plugins.
    pub fn subtree(&self) -> PathBuf {
        PathBuf::from("plugins").join(self.as_str())
    }

    /// File name of this category's catalog partition.
    pub fn artifact_file(&self) -> String {
        format!("{}.json", self.as_str())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const INPUT_CONFIGS: &str = include_str!("../sampleconfigs/inputs.json");
const OUTPUT_CONFIGS: &str = include_str!("../sampleconfigs/outputs.json");
const PROCESSOR_CONFIGS: &str = include_str!("../sampleconfigs/processors.json");
const AGGREGATOR_CONFIGS: &str = include_str!("../sampleconfigs/aggregators.json");

fn decode(category: &'static str, raw: &str) -> Result<Vec<Plugin>, CatalogCorruptError> {
    serde_json::from_str(raw).map_err(|source| CatalogCorruptError { category, source })
}

pub fn input_plugins() -> Result<Vec<Plugin>, CatalogCorruptError> {
    decode("inputs", INPUT_CONFIGS)
}

pub fn output_plugins() -> Result<Vec<Plugin>, CatalogCorruptError> {
    decode("outputs", OUTPUT_CONFIGS)
}

pub fn processor_plugins() -> Result<Vec<Plugin>, CatalogCorruptError> {
    decode("processors", PROCESSOR_CONFIGS)
}

pub fn aggregator_plugins() -> Result<Vec<Plugin>, CatalogCorruptError> {
    decode("aggregators", AGGREGATOR_CONFIGS)
}
