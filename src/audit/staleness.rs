//! Update audit: which collected files are stale relative to upstream.
//!
//! For every translatable file in the local tree, the audit resolves two
//! commits through the cache: the one in effect at the file's recorded
//! collection date, and the one in effect now. Divergent SHAs mean the
//! upstream document changed since collection.
//!
//! A file whose front matter lacks a usable `collected_date` cannot be
//! compared at all. By default that aborts the whole run - a missing
//! collection date is a data-quality bug in the mirror, not a condition to
//! skip past. Lenient mode collects such files into the report instead and
//! keeps checking.

use anyhow::Result;
use chrono::{NaiveTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::cache::MetadataCache;
use crate::config::Settings;
use crate::mapping::PathMapper;
use crate::markdown::FrontmatterReader;
use crate::remote::{FileCommitRecord, RemoteSource};

/// Comparison outcome for one collected file.
///
/// `Unknown` covers the case where both commit lookups failed; reporting it
/// as "up to date" would hide persistent lookup failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Collected and latest commit agree.
    Current,
    /// The upstream file changed since collection (or exactly one lookup
    /// failed, which cannot be distinguished from a change).
    Stale,
    /// Both lookups failed; nothing can be said.
    Unknown,
}

impl Freshness {
    /// Classifies a cached commit record.
    pub fn of(record: &FileCommitRecord) -> Self {
        match (&record.collected.sha, &record.latest.sha) {
            (None, None) => Self::Unknown,
            (collected, latest) if collected == latest => Self::Current,
            _ => Self::Stale,
        }
    }
}

/// A file the audit could not check, with the reason (lenient mode only).
#[derive(Debug, Clone, Serialize)]
pub struct FileIssue {
    /// Local path of the unauditable file.
    pub path: String,
    /// Why the check was impossible.
    pub reason: String,
}

/// Result of one update audit.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateReport {
    /// How many local translatable files were scanned.
    pub local_files: usize,
    /// Files whose upstream changed since collection, in scan order.
    pub stale: Vec<String>,
    /// Files whose freshness could not be determined (both lookups failed).
    pub unknown: Vec<String>,
    /// Files skipped for bad front matter (lenient mode).
    pub errors: Vec<FileIssue>,
}

/// Checks every collected file against the upstream history.
///
/// Commit records are read through the cache (namespace `commits`, keyed by
/// local path); on miss, both as-of lookups run against the remote source
/// and the combined record is written back. `lenient` selects the
/// front-matter failure policy described in the module docs.
pub async fn audit_updates<S: RemoteSource>(
    settings: &Settings,
    mapper: &PathMapper,
    reader: &FrontmatterReader,
    cache: &mut MetadataCache,
    source: &S,
    lenient: bool,
) -> Result<UpdateReport> {
    let local_files = scan_local_tree(settings);
    info!(
        "checking {} local files for updates (suffixes {:?})",
        local_files.len(),
        settings.translatable_suffixes
    );

    let mut stale = Vec::new();
    let mut unknown = Vec::new();
    let mut errors = Vec::new();

    for local_path in &local_files {
        let full_path = settings.project_dir.join(local_path);
        let collected_date = match reader
            .read(&full_path)
            .and_then(|fm| fm.collected_date(&full_path))
        {
            Ok(date) => date,
            Err(err) if lenient => {
                warn!("skipping {local_path}: {err}");
                errors.push(FileIssue {
                    path: local_path.clone(),
                    reason: err.to_string(),
                });
                continue;
            }
            Err(err) => return Err(err.into()),
        };

        let collected_instant = collected_date.and_time(NaiveTime::MIN).and_utc();
        let upstream_path = mapper.to_upstream(local_path);
        let record = cache
            .commits_or_fetch(local_path, settings.cache_ttl(), || async {
                let collected = source.commit_as_of(&upstream_path, collected_instant).await;
                let latest = source.commit_as_of(&upstream_path, Utc::now()).await;
                Ok(FileCommitRecord { collected, latest })
            })
            .await?;

        match Freshness::of(&record) {
            Freshness::Current => {}
            Freshness::Stale => {
                info!(
                    "{local_path} is stale: collected {:?}, latest {:?}",
                    record.collected.date, record.latest.date
                );
                stale.push(local_path.clone());
            }
            Freshness::Unknown => {
                warn!("{local_path}: both commit lookups failed, freshness unknown");
                unknown.push(local_path.clone());
            }
        }
    }

    Ok(UpdateReport {
        local_files: local_files.len(),
        stale,
        unknown,
        errors,
    })
}

/// Collects translatable files under the local root, as project-relative
/// paths in a stable scan order.
fn scan_local_tree(settings: &Settings) -> Vec<String> {
    let local_dir = settings.project_dir.join(&settings.local_root);
    let mut files = Vec::new();
    for entry in WalkDir::new(&local_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if !settings
            .translatable_suffixes
            .iter()
            .any(|suffix| name.ends_with(suffix.as_str()))
        {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(&settings.project_dir)
            .unwrap_or_else(|_| entry.path());
        files.push(relative.to_string_lossy().into_owned());
    }
    files
}
