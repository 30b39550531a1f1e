//! End-to-end pipeline tests against a fake upstream tree on disk.
//!
//! The release query is mocked; acquisition reuses a pre-built tree copy,
//! so no network is involved.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use telegraf_companion::acquire::GitTreeSource;
use telegraf_companion::catalog::{Category, Plugin};
use telegraf_companion::config::{SourceFormat, SyncConfig};
use telegraf_companion::contract::MockReleaseSource;
use telegraf_companion::serialize;
use telegraf_companion::synchronise::{synchronise, SyncReport};

fn write_sample(tree: &Path, category: &str, plugin: &str, body: &str) {
    let dir = tree.join("plugins").join(category).join(plugin);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("sample.conf"), body).unwrap();
}

/// Builds a minimal upstream tree with two input plugins, one excluded
/// input plugin, and one plugin per remaining category.
fn build_fake_tree(tree: &Path) {
    write_sample(
        tree,
        "inputs",
        "cpu",
        "# Read metrics about cpu usage\n[[inputs.cpu]]\n  percpu = true\n",
    );
    write_sample(
        tree,
        "inputs",
        "mem",
        "# Read metrics about memory usage\n[[inputs.mem]]\n",
    );
    write_sample(
        tree,
        "inputs",
        "jolokia2",
        "# multi-module plugin, excluded\n[[inputs.jolokia2_agent]]\n",
    );
    write_sample(
        tree,
        "outputs",
        "file",
        "# Send metrics to file(s)\n[[outputs.file]]\n  files = [\"stdout\"]\n",
    );
    write_sample(
        tree,
        "processors",
        "rename",
        "# Rename measurements, tags and fields\n[[processors.rename]]\n",
    );
    write_sample(
        tree,
        "aggregators",
        "minmax",
        "# Keep the aggregate min/max of each metric\n[[aggregators.minmax]]\n  period = \"30s\"\n",
    );
}

fn test_config(root: &Path) -> SyncConfig {
    SyncConfig {
        // Bogus URL: any attempted clone would fail loudly.
        repo_url: "file:///nonexistent/telegraf".to_string(),
        releases_url: "http://localhost:0/unused".to_string(),
        tree_dir: root.join("telegraf"),
        output_dir: root.join("sampleconfigs"),
        format: SourceFormat::SampleConf,
    }
}

fn load_partition(config: &SyncConfig, category: Category) -> Vec<Plugin> {
    let raw = fs::read_to_string(config.output_dir.join(category.artifact_file())).unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[tokio::test]
async fn full_sync_then_gate_short_circuits() {
    let root = TempDir::new().unwrap();
    let config = test_config(root.path());
    build_fake_tree(&config.tree_dir);

    let mut releases = MockReleaseSource::new();
    releases
        .expect_latest_tag()
        .times(2)
        .returning(|| Ok("v1.30.0".to_string()));
    let tree = GitTreeSource::new(&config.repo_url);

    // First run extracts and serializes everything.
    let report = synchronise(&config, &releases, &tree).await.unwrap();
    match report {
        SyncReport::Synced { tag, counts } => {
            assert_eq!(tag, "v1.30.0");
            let lookup: Vec<_> = counts.iter().map(|(c, n)| (c.as_str(), *n)).collect();
            assert!(lookup.contains(&("inputs", 2)), "jolokia2 must be excluded: {lookup:?}");
            assert!(lookup.contains(&("outputs", 1)));
            assert!(lookup.contains(&("processors", 1)));
            assert!(lookup.contains(&("aggregators", 1)));
        }
        other => panic!("expected a full sync, got {other:?}"),
    }

    // The disposable tree copy is gone after the run.
    assert!(!config.tree_dir.exists());

    // Records round-trip field-for-field through the serialized form.
    let inputs = load_partition(&config, Category::Inputs);
    let cpu = inputs.iter().find(|p| p.name == "cpu").unwrap();
    assert_eq!(cpu.description, "Read metrics about cpu usage");
    assert_eq!(cpu.sample_config, "[[inputs.cpu]]\n  percpu = true\n");
    assert!(inputs.iter().all(|p| p.name != "jolokia2"));

    // Marker now holds the synced tag.
    let marker = fs::read_to_string(config.marker_path()).unwrap();
    assert_eq!(marker.trim(), "v1.30.0");

    // Second run with an unchanged upstream does no work: the tree copy is
    // gone and acquisition would fail if it were attempted.
    let report = synchronise(&config, &releases, &tree).await.unwrap();
    assert!(matches!(report, SyncReport::UpToDate { tag } if tag == "v1.30.0"));
}

#[tokio::test]
async fn each_category_is_independently_sourced() {
    let root = TempDir::new().unwrap();
    let config = test_config(root.path());
    build_fake_tree(&config.tree_dir);

    let mut releases = MockReleaseSource::new();
    releases
        .expect_latest_tag()
        .returning(|| Ok("v1.30.0".to_string()));
    let tree = GitTreeSource::new(&config.repo_url);

    synchronise(&config, &releases, &tree).await.unwrap();

    assert_eq!(load_partition(&config, Category::Outputs)[0].name, "file");
    assert_eq!(
        load_partition(&config, Category::Processors)[0].name,
        "rename"
    );
    assert_eq!(
        load_partition(&config, Category::Aggregators)[0].name,
        "minmax"
    );
}

#[tokio::test]
async fn sync_then_clean_restores_previous_generation() {
    let root = TempDir::new().unwrap();
    let config = test_config(root.path());
    build_fake_tree(&config.tree_dir);

    // Pre-run state: one prior generation plus its marker.
    fs::create_dir_all(&config.output_dir).unwrap();
    let mut priors = Vec::new();
    for category in Category::ALL {
        let live = config.output_dir.join(category.artifact_file());
        let body = "[]\n".to_string();
        fs::write(&live, &body).unwrap();
        priors.push((live, body));
    }
    fs::write(config.marker_path(), "v1.29.5\n").unwrap();

    let mut releases = MockReleaseSource::new();
    releases
        .expect_latest_tag()
        .returning(|| Ok("v1.30.0".to_string()));
    let tree = GitTreeSource::new(&config.repo_url);

    synchronise(&config, &releases, &tree).await.unwrap();
    assert_ne!(
        fs::read_to_string(&priors[0].0).unwrap(),
        priors[0].1,
        "sync must have replaced the artifact"
    );

    serialize::clean(&config.output_dir, &config.marker_path()).unwrap();

    for (live, body) in priors {
        assert_eq!(fs::read_to_string(&live).unwrap(), body);
        assert!(!serialize::backup_path(&live).exists());
    }
    assert_eq!(
        fs::read_to_string(config.marker_path()).unwrap(),
        "v1.29.5\n"
    );
}

#[tokio::test]
async fn broken_tree_aborts_before_any_partition_is_written() {
    let root = TempDir::new().unwrap();
    let config = test_config(root.path());

    // Only the inputs subtree exists; outputs extraction must fail.
    write_sample(&config.tree_dir, "inputs", "cpu", "# cpu\n[[inputs.cpu]]\n");

    let mut releases = MockReleaseSource::new();
    releases
        .expect_latest_tag()
        .returning(|| Ok("v1.30.0".to_string()));
    let tree = GitTreeSource::new(&config.repo_url);

    let err = synchronise(&config, &releases, &tree).await.unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("walk"), "unexpected error: {msg}");

    // All-or-nothing: no partition reached disk, not even inputs.
    for category in Category::ALL {
        assert!(!config.output_dir.join(category.artifact_file()).exists());
    }

    // The tree copy is removed on the failure path too.
    assert!(!config.tree_dir.exists());

    // Marker-first policy: the new tag was committed before extraction, so
    // the failed sync will not retry on the next run.
    assert_eq!(
        fs::read_to_string(config.marker_path()).unwrap().trim(),
        "v1.30.0"
    );
}
