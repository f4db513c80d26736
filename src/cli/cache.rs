//! The `cache` command: inspect or drop the metadata cache file.

use anyhow::{Context, Result};
use chrono::{TimeZone, Utc};
use clap::{Args, Subcommand};
use colored::Colorize;
use std::path::Path;

use crate::cache::MetadataCache;
use crate::config::Settings;

/// Arguments for `docaudit cache`.
#[derive(Debug, Args)]
pub struct CacheCommand {
    #[command(subcommand)]
    command: CacheSubcommand,
}

#[derive(Debug, Subcommand)]
enum CacheSubcommand {
    /// Show the cache location and per-namespace freshness.
    Info,
    /// Delete the cache file; the next check starts cold.
    Clean,
}

impl CacheCommand {
    pub async fn execute(self, config_path: Option<&Path>) -> Result<()> {
        let settings = Settings::load(config_path)?;
        match self.command {
            CacheSubcommand::Info => info(&settings),
            CacheSubcommand::Clean => clean(&settings),
        }
    }
}

fn info(settings: &Settings) -> Result<()> {
    let cache = MetadataCache::load(settings.cache_file.clone())?;
    println!("{} {}", "Cache file:".bold(), cache.path().display());
    let namespaces = cache.namespace_summary();
    if namespaces.is_empty() {
        println!("  (empty)");
        return Ok(());
    }
    for (name, cache_time, entries) in namespaces {
        let refreshed = Utc
            .timestamp_opt(cache_time, 0)
            .single()
            .map_or_else(|| "unknown".to_string(), |t| t.to_rfc3339());
        println!("  {name}: {entries} entries, last refresh {refreshed}");
    }
    Ok(())
}

fn clean(settings: &Settings) -> Result<()> {
    let cache = MetadataCache::load(settings.cache_file.clone())?;
    let path = cache.path();
    if path.exists() {
        std::fs::remove_file(path)
            .with_context(|| format!("failed to remove {}", path.display()))?;
        println!("Removed {}", path.display());
    } else {
        println!("Nothing to clean at {}", path.display());
    }
    Ok(())
}
