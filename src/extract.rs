//! Document extraction: turns one category subtree into plugin records.
//!
//! The walk is shared between the two documentation formats; the strategy
//! in use decides which file name marks a plugin and how a matched file
//! becomes a record (see [`DocumentParser`]).

use std::ffi::OsStr;
use std::fs;
use std::path::Path;

use comrak::nodes::{AstNode, NodeValue};
use comrak::{parse_document, Arena, Options};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::catalog::Plugin;
use crate::contract::DocumentParser;
use crate::errors::ExtractionError;

/// Plugins that intentionally break the one-plugin-one-doc convention
/// upstream (multi-module layouts). They never produce a record.
pub const EXCLUDED_PLUGINS: &[&str] = &["jolokia2"];

/// Walks `root` recursively and parses every matched documentation file.
///
/// Record order follows the directory-walk traversal order; it is not
/// sorted afterwards and consumers must treat it as display order only.
pub fn extract_category<P>(root: &Path, parser: &P) -> Result<Vec<Plugin>, ExtractionError>
where
    P: DocumentParser,
{
    info!(
        root = %root.display(),
        doc_file = parser.doc_file_name(),
        "extracting plugin records"
    );
    let mut plugins = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|source| ExtractionError::Walk {
            root: root.to_path_buf(),
            source,
        })?;
        if entry.file_name() != parser.doc_file_name() {
            continue;
        }
        // The plugin is named after the directory holding its documentation.
        let name = match entry.path().parent().and_then(Path::file_name).and_then(OsStr::to_str) {
            Some(name) => name,
            None => continue,
        };
        if EXCLUDED_PLUGINS.contains(&name) {
            debug!(plugin = name, "skipping excluded plugin");
            continue;
        }
        let plugin = parser.parse(name, entry.path())?;
        debug!(plugin = %plugin.name, path = %entry.path().display(), "parsed plugin record");
        plugins.push(plugin);
    }
    info!(root = %root.display(), count = plugins.len(), "extraction complete");
    Ok(plugins)
}

/// Strips one leading comment marker and surrounding whitespace from a
/// description line.
fn strip_comment_marker(line: &str) -> String {
    let trimmed = line.trim();
    trimmed.strip_prefix('#').unwrap_or(trimmed).trim().to_string()
}

/// Structured-markdown strategy: one `README.md` per plugin, with the
/// sample configuration in a fenced `toml` block under the top-level
/// "Configuration" section.
pub struct ReadmeParser;

impl DocumentParser for ReadmeParser {
    fn doc_file_name(&self) -> &'static str {
        "README.md"
    }

    fn parse(&self, plugin_name: &str, doc_path: &Path) -> Result<Plugin, ExtractionError> {
        let text = fs::read_to_string(doc_path).map_err(|source| ExtractionError::ReadDoc {
            path: doc_path.to_path_buf(),
            source,
        })?;
        let (description, sample_config) = parse_readme(&text);
        Ok(Plugin {
            name: plugin_name.to_string(),
            description,
            sample_config,
        })
    }
}

/// Scans top-level sections by heading; inside "Configuration", the first
/// fenced block tagged `toml` supplies the record. No qualifying block is
/// not an error: documentation quality varies upstream.
fn parse_readme(text: &str) -> (String, String) {
    let arena = Arena::new();
    let root = parse_document(&arena, text, &Options::default());

    let mut section = String::new();
    for node in root.children() {
        match &node.data.borrow().value {
            NodeValue::Heading(_) => section = heading_text(node),
            NodeValue::CodeBlock(block) if block.fenced => {
                let language = block.info.split_whitespace().next().unwrap_or("");
                if section == "Configuration" && language == "toml" {
                    let first_line = block.literal.lines().next().unwrap_or("");
                    return (strip_comment_marker(first_line), block.literal.clone());
                }
            }
            _ => {}
        }
    }
    (String::new(), String::new())
}

fn heading_text<'a>(node: &'a AstNode<'a>) -> String {
    let mut out = String::new();
    for child in node.descendants() {
        match &child.data.borrow().value {
            NodeValue::Text(text) => out.push_str(text),
            NodeValue::Code(code) => out.push_str(&code.literal),
            _ => {}
        }
    }
    out
}

/// Plain-sample strategy: one standalone `sample.conf` fragment per plugin.
/// First line is the description; the rest is the configuration verbatim.
pub struct SampleConfParser;

impl DocumentParser for SampleConfParser {
    fn doc_file_name(&self) -> &'static str {
        "sample.conf"
    }

    fn parse(&self, plugin_name: &str, doc_path: &Path) -> Result<Plugin, ExtractionError> {
        let text = fs::read_to_string(doc_path).map_err(|source| ExtractionError::ReadDoc {
            path: doc_path.to_path_buf(),
            source,
        })?;

        let mut lines = text.lines();
        let description = lines.next().map(strip_comment_marker).unwrap_or_default();
        let mut sample_config = String::new();
        for line in lines {
            sample_config.push_str(line);
            sample_config.push('\n');
        }

        Ok(Plugin {
            name: plugin_name.to_string(),
            description,
            sample_config,
        })
    }
}
