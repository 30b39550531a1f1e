pub mod acquire;
pub mod catalog;
pub mod config;
pub mod contract;
pub mod errors;
pub mod extract;
pub mod load_config;
pub mod release;
pub mod serialize;
pub mod synchronise;
pub mod version_gate;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::acquire::GitTreeSource;
use crate::load_config::load_config;
use crate::release::GithubReleaseSource;
use crate::synchronise::{synchronise, SyncReport};

#[derive(Parser)]
#[clap(
    name = "telegraf-companion",
    version,
    about = "Browse Telegraf plugin sample configurations offline; keeps the embedded catalog in sync with upstream releases"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Update the plugin catalog from the latest upstream release
    Sync {
        /// Path to the YAML config file (built-in defaults apply when omitted)
        #[clap(long)]
        config: Option<PathBuf>,
        /// Roll back to the previously generated catalog instead of syncing
        #[clap(long)]
        clean: bool,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Sync { config, clean } => {
            let config = load_config(config.as_deref())?;

            if clean {
                serialize::clean(&config.output_dir, &config.marker_path())?;
                println!("Catalog restored to the previous generation.");
                return Ok(());
            }

            let releases = GithubReleaseSource::new(&config.releases_url)?;
            let tree = GitTreeSource::new(&config.repo_url);
            println!("Synchronise starting...");
            match synchronise(&config, &releases, &tree).await {
                Ok(SyncReport::UpToDate { tag }) => {
                    println!("Catalog already up to date with {tag}.");
                    Ok(())
                }
                Ok(SyncReport::Synced { tag, counts }) => {
                    println!("Synchronise complete for {tag}.");
                    for (category, count) in counts {
                        println!("  {category}: {count} plugins");
                    }
                    Ok(())
                }
                Err(e) => {
                    eprintln!("[ERROR] Synchronisation failed: {e}");
                    Err(e.into())
                }
            }
        }
    }
}
