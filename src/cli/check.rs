//! The `check` command: collection audit followed by update audit.
//!
//! This is the tool's main entry point and always runs both audits - first
//! "what was never collected", then "what went stale" - against the same
//! cache and remote client. Results are printed as a colored human summary
//! by default, or as one JSON document with `--format json`.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

use crate::audit::{CollectionReport, UpdateReport, audit_collection, audit_updates};
use crate::cache::MetadataCache;
use crate::config::Settings;
use crate::mapping::PathMapper;
use crate::markdown::FrontmatterReader;
use crate::remote::GithubClient;

/// Arguments for `docaudit check`.
#[derive(Debug, Args)]
pub struct CheckCommand {
    /// Project directory containing the collected tree.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub project_dir: PathBuf,

    /// Upstream repository as owner/repo (overrides the config file).
    #[arg(long, value_name = "OWNER/REPO")]
    pub repo: Option<String>,

    /// GitHub API token (overrides the config file).
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Collect front-matter errors per file instead of aborting on the
    /// first one.
    #[arg(long)]
    pub lenient: bool,

    /// Output format (text or json).
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub format: String,

    /// Exit with a non-zero code when anything is uncollected or stale.
    #[arg(long)]
    pub gate: bool,
}

/// JSON output shape of one full check run.
#[derive(Debug, Serialize)]
struct CheckResult<'a> {
    collection: &'a CollectionReport,
    update: &'a UpdateReport,
    summary: CheckSummary,
}

#[derive(Debug, Serialize)]
struct CheckSummary {
    upstream_files: usize,
    local_files: usize,
    uncollected: usize,
    stale: usize,
    unknown: usize,
    errors: usize,
}

impl CheckCommand {
    /// Runs both audits and renders the result.
    pub async fn execute(self, config_path: Option<&Path>) -> Result<()> {
        let started = Instant::now();
        let mut settings = Settings::load(config_path)?;
        if let Some(repo) = &self.repo {
            settings.repository = repo.clone();
        }
        if let Some(token) = &self.token {
            settings.github_token = Some(token.clone());
        }
        settings.project_dir = self.project_dir.clone();

        let mapper = PathMapper::new(settings.local_root.clone(), settings.upstream_root.clone());
        let reader = FrontmatterReader::new();
        let mut cache = MetadataCache::load(settings.cache_file.clone())?;
        let client = GithubClient::new(settings.repository.clone(), settings.token())
            .context("failed to create GitHub client")?;

        info!("auditing {} against {}", settings.project_dir.display(), settings.repository);

        let collection = audit_collection(&settings, &mapper, &mut cache, &client)
            .await
            .context("collection audit failed")?;
        let update = audit_updates(&settings, &mapper, &reader, &mut cache, &client, self.lenient)
            .await
            .context("update audit failed")?;

        info!("done in {:.2}s", started.elapsed().as_secs_f64());

        if self.format == "json" {
            print_json(&collection, &update)?;
        } else {
            print_text(&collection, &update);
        }

        if self.gate && (!collection.uncollected.is_empty() || !update.stale.is_empty()) {
            std::process::exit(1);
        }
        Ok(())
    }
}

fn print_json(collection: &CollectionReport, update: &UpdateReport) -> Result<()> {
    let result = CheckResult {
        collection,
        update,
        summary: CheckSummary {
            upstream_files: collection.upstream_files,
            local_files: update.local_files,
            uncollected: collection.uncollected.len(),
            stale: update.stale.len(),
            unknown: update.unknown.len(),
            errors: update.errors.len(),
        },
    };
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn print_text(collection: &CollectionReport, update: &UpdateReport) {
    println!(
        "{} {} upstream files, {} uncollected",
        "Collection:".bold(),
        collection.upstream_files,
        collection.uncollected.len()
    );
    for path in &collection.uncollected {
        println!("  {} {path}", "missing".red());
    }

    println!(
        "{} {} local files, {} stale, {} unknown",
        "Updates:".bold(),
        update.local_files,
        update.stale.len(),
        update.unknown.len()
    );
    for path in &update.stale {
        println!("  {} {path}", "stale".yellow());
    }
    for path in &update.unknown {
        println!("  {} {path}", "unknown".dimmed());
    }
    for issue in &update.errors {
        println!("  {} {}: {}", "error".red().bold(), issue.path, issue.reason);
    }

    if collection.uncollected.is_empty() && update.stale.is_empty() && update.unknown.is_empty() {
        println!("{}", "The mirror is fully collected and up to date!".green());
    }
}
