//! Collection audit: which upstream files have no local counterpart.

use anyhow::Result;
use serde::Serialize;
use tracing::{info, warn};

use crate::cache::MetadataCache;
use crate::config::Settings;
use crate::mapping::PathMapper;
use crate::remote::RemoteSource;

/// Result of one collection audit.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionReport {
    /// How many upstream files the listing contained.
    pub upstream_files: usize,
    /// Upstream paths with no local counterpart, in listing traversal order.
    pub uncollected: Vec<String>,
}

/// Walks the upstream tree listing and reports files that were never
/// collected locally.
///
/// The listing is read through the cache (namespace `files`, keyed by root
/// and exclusion set); listing errors from the remote client propagate.
/// Upstream files whose extension is in the skip list never need a local
/// counterpart and are not reported.
pub async fn audit_collection<S: RemoteSource>(
    settings: &Settings,
    mapper: &PathMapper,
    cache: &mut MetadataCache,
    source: &S,
) -> Result<CollectionReport> {
    let key = listing_key(&settings.upstream_root, &settings.exclude_dirs);
    let upstream_files = cache
        .listing_or_fetch(&key, settings.cache_ttl(), || {
            source.list_tree(&settings.upstream_root, &settings.exclude_dirs)
        })
        .await?;

    info!(
        "checking collection of {} upstream files (ignoring {:?})",
        upstream_files.len(),
        settings.skip_extensions
    );

    let mut uncollected = Vec::new();
    for upstream_path in &upstream_files {
        if settings
            .skip_extensions
            .iter()
            .any(|ext| upstream_path.ends_with(ext.as_str()))
        {
            continue;
        }
        let local_path = settings.project_dir.join(mapper.to_local(upstream_path));
        if !local_path.is_file() {
            warn!("{} is not collected (expected {})", upstream_path, local_path.display());
            uncollected.push(upstream_path.clone());
        }
    }

    Ok(CollectionReport {
        upstream_files: upstream_files.len(),
        uncollected,
    })
}

/// Cache key for one listing: root plus the exclusion set that shaped it.
fn listing_key(root: &str, exclude_dirs: &[String]) -> String {
    format!("{root}|{}", exclude_dirs.join(","))
}
