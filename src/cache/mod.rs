//! Persistent, TTL-scoped metadata cache.
//!
//! Remote metadata is expensive (one HTTP round trip per directory or commit
//! lookup, against a rate-limited API), so every audit reads through this
//! store. It is a typed key-value document with independent namespaces -
//! [`NAMESPACE_FILES`] for directory listings, [`NAMESPACE_COMMITS`] for
//! per-file commit records - persisted wholesale to a single JSON file.
//!
//! # Expiry model
//!
//! Each namespace carries one shared `cache_time`: the instant after which no
//! entry in that namespace has been refreshed. An entry is served from cache
//! when it exists and `now - cache_time < ttl`; a stale entry forces
//! re-derivation of that key only, but any write advances the shared clock
//! for the whole namespace. Namespace-wide TTL keeps API usage bounded at
//! the cost of coarse invalidation, which fits a tool that refreshes
//! listings and commit histories in batches.
//!
//! # Durability
//!
//! The document is loaded once at command start and rewritten after every
//! miss (eager persistence - a crash later in the run never loses fetched
//! metadata). A corrupt or unreadable file cold-starts an empty cache with a
//! log line; a failed write is logged and swallowed, leaving the in-memory
//! state authoritative for the rest of the process. A single concurrent
//! invocation is assumed: there is no locking and the last writer wins.
//!
//! The store is an explicit value passed `&mut` to whoever needs it, never
//! process-global, so tests can run independent instances side by side.

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::constants::CACHE_FILE_ENV;
use crate::remote::FileCommitRecord;

/// Namespace holding remote directory listings.
pub const NAMESPACE_FILES: &str = "files";

/// Namespace holding per-file commit records.
pub const NAMESPACE_COMMITS: &str = "commits";

/// One cached value, tagged by shape.
///
/// The tag makes a partially-matching or legacy cache file fail the single
/// deserialization step at load time instead of producing a deferred lookup
/// error mid-audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CachePayload {
    /// A recursive file listing, in traversal order.
    Listing(Vec<String>),
    /// Commit metadata for one collected file.
    Commits(FileCommitRecord),
}

/// One namespace of the cache document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NamespaceEntry {
    /// Epoch seconds of the last write to this namespace. Shared by every
    /// entry: no entry was refreshed after this instant was set.
    pub cache_time: i64,
    /// Keyed payloads.
    #[serde(default)]
    pub entries: BTreeMap<String, CachePayload>,
}

/// The whole persisted state: namespace name to namespace entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheDocument {
    #[serde(flatten)]
    namespaces: BTreeMap<String, NamespaceEntry>,
}

/// Process-durable metadata cache over a single JSON file.
#[derive(Debug)]
pub struct MetadataCache {
    path: PathBuf,
    document: CacheDocument,
}

impl MetadataCache {
    /// Opens the cache at its default location (or the configured override).
    ///
    /// A missing, unreadable, or corrupt file is never fatal: the cache
    /// cold-starts empty and the condition is logged.
    pub fn load(path_override: Option<PathBuf>) -> Result<Self> {
        let path = match path_override {
            Some(path) => path,
            None => Self::default_path()?,
        };
        Ok(Self::load_from(path))
    }

    /// Opens the cache at an explicit path. Used by tests to run independent
    /// store instances.
    pub fn load_from(path: PathBuf) -> Self {
        let document = match std::fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(document) => {
                    info!("loaded cache from {}", path.display());
                    document
                }
                Err(err) => {
                    warn!(
                        "cache file {} is not valid, starting empty: {err}",
                        path.display()
                    );
                    CacheDocument::default()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!("no cache file at {}, starting empty", path.display());
                CacheDocument::default()
            }
            Err(err) => {
                warn!(
                    "failed to read cache file {}, starting empty: {err}",
                    path.display()
                );
                CacheDocument::default()
            }
        };
        Self { path, document }
    }

    /// Default cache file location: `~/.docaudit/cache.json`, overridable
    /// with the `DOCAUDIT_CACHE_FILE` environment variable.
    pub fn default_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var(CACHE_FILE_ENV) {
            return Ok(PathBuf::from(path));
        }
        let home = dirs::home_dir().context("unable to determine home directory")?;
        Ok(home.join(".docaudit").join("cache.json"))
    }

    /// The file this cache persists to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the cached value for `namespace`/`key`, fetching and storing
    /// it if absent or expired.
    ///
    /// The fetch future is awaited inline; on success the result is written
    /// through to disk before it is returned. Callers that know the payload
    /// shape should prefer [`listing_or_fetch`](Self::listing_or_fetch) or
    /// [`commits_or_fetch`](Self::commits_or_fetch).
    pub async fn get_or_fetch<F, Fut>(
        &mut self,
        namespace: &str,
        key: &str,
        ttl: Duration,
        fetch: F,
    ) -> Result<CachePayload>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<CachePayload>>,
    {
        let now = Utc::now().timestamp();
        if let Some(payload) = self.fresh_entry(namespace, key, ttl, now) {
            debug!("cache hit for {namespace}/{key}");
            return Ok(payload.clone());
        }
        let payload = fetch().await?;
        self.store(namespace, key, payload.clone(), now);
        Ok(payload)
    }

    /// Typed read-through for the `files` namespace.
    ///
    /// A cached entry of the wrong variant is treated as a miss and
    /// re-fetched, not a panic - the document may predate a schema change.
    pub async fn listing_or_fetch<F, Fut>(
        &mut self,
        key: &str,
        ttl: Duration,
        fetch: F,
    ) -> Result<Vec<String>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<String>>>,
    {
        let now = Utc::now().timestamp();
        if let Some(CachePayload::Listing(files)) = self.fresh_entry(NAMESPACE_FILES, key, ttl, now)
        {
            debug!("cache hit for {NAMESPACE_FILES}/{key}");
            return Ok(files.clone());
        }
        let files = fetch().await?;
        self.store(NAMESPACE_FILES, key, CachePayload::Listing(files.clone()), now);
        Ok(files)
    }

    /// Typed read-through for the `commits` namespace.
    pub async fn commits_or_fetch<F, Fut>(
        &mut self,
        key: &str,
        ttl: Duration,
        fetch: F,
    ) -> Result<FileCommitRecord>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<FileCommitRecord>>,
    {
        let now = Utc::now().timestamp();
        if let Some(CachePayload::Commits(record)) =
            self.fresh_entry(NAMESPACE_COMMITS, key, ttl, now)
        {
            debug!("cache hit for {NAMESPACE_COMMITS}/{key}");
            return Ok(record.clone());
        }
        let record = fetch().await?;
        self.store(
            NAMESPACE_COMMITS,
            key,
            CachePayload::Commits(record.clone()),
            now,
        );
        Ok(record)
    }

    /// Per-namespace summary for `docaudit cache info`: name, last refresh
    /// epoch, entry count.
    pub fn namespace_summary(&self) -> Vec<(&str, i64, usize)> {
        self.document
            .namespaces
            .iter()
            .map(|(name, ns)| (name.as_str(), ns.cache_time, ns.entries.len()))
            .collect()
    }

    fn fresh_entry(&self, namespace: &str, key: &str, ttl: Duration, now: i64) -> Option<&CachePayload> {
        let ns = self.document.namespaces.get(namespace)?;
        let payload = ns.entries.get(key)?;
        if now - ns.cache_time < ttl.as_secs() as i64 {
            Some(payload)
        } else {
            None
        }
    }

    /// Inserts a payload, advances the namespace clock, and persists.
    fn store(&mut self, namespace: &str, key: &str, payload: CachePayload, now: i64) {
        let ns = self
            .document
            .namespaces
            .entry(namespace.to_string())
            .or_default();
        ns.entries.insert(key.to_string(), payload);
        ns.cache_time = now;
        self.save();
    }

    /// Writes the whole document to disk. Failures are logged and swallowed;
    /// the in-memory state stays valid for the rest of the process.
    fn save(&self) {
        if let Err(err) = self.try_save() {
            warn!("failed to save cache to {}: {err:#}", self.path.display());
        }
    }

    fn try_save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.document)?;
        std::fs::write(&self.path, json)?;
        debug!("saved cache to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::CommitStamp;
    use std::cell::Cell;
    use tempfile::TempDir;

    const TTL: Duration = Duration::from_secs(300);

    fn cache_in(dir: &TempDir) -> MetadataCache {
        MetadataCache::load_from(dir.path().join("cache.json"))
    }

    fn record(collected_sha: &str, latest_sha: &str) -> FileCommitRecord {
        FileCommitRecord {
            collected: CommitStamp {
                sha: Some(collected_sha.to_string()),
                date: Some("2024-03-15 09:30:00".to_string()),
            },
            latest: CommitStamp {
                sha: Some(latest_sha.to_string()),
                date: Some("2024-06-01 12:00:00".to_string()),
            },
        }
    }

    #[tokio::test]
    async fn fetches_once_and_serves_from_cache() {
        let dir = TempDir::new().unwrap();
        let mut cache = cache_in(&dir);
        let calls = Cell::new(0);

        for _ in 0..2 {
            let listing = cache
                .listing_or_fetch("docs/", TTL, || async {
                    calls.set(calls.get() + 1);
                    Ok(vec!["docs/a.md".to_string()])
                })
                .await
                .unwrap();
            assert_eq!(listing, vec!["docs/a.md".to_string()]);
        }
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test]
    async fn expired_namespace_forces_refetch() {
        let dir = TempDir::new().unwrap();
        let mut cache = cache_in(&dir);
        cache
            .listing_or_fetch("docs/", TTL, || async { Ok(vec!["old".to_string()]) })
            .await
            .unwrap();

        // One second past the TTL window: must re-derive.
        let ns = cache.document.namespaces.get_mut(NAMESPACE_FILES).unwrap();
        ns.cache_time = Utc::now().timestamp() - TTL.as_secs() as i64 - 1;

        let listing = cache
            .listing_or_fetch("docs/", TTL, || async { Ok(vec!["new".to_string()]) })
            .await
            .unwrap();
        assert_eq!(listing, vec!["new".to_string()]);
    }

    #[tokio::test]
    async fn entry_inside_ttl_window_is_not_refetched() {
        let dir = TempDir::new().unwrap();
        let mut cache = cache_in(&dir);
        cache
            .listing_or_fetch("docs/", TTL, || async { Ok(vec!["kept".to_string()]) })
            .await
            .unwrap();

        // One second short of expiry: still fresh.
        let ns = cache.document.namespaces.get_mut(NAMESPACE_FILES).unwrap();
        ns.cache_time = Utc::now().timestamp() - TTL.as_secs() as i64 + 1;

        let listing = cache
            .listing_or_fetch("docs/", TTL, || async {
                panic!("fetch must not run for a fresh entry")
            })
            .await
            .unwrap();
        assert_eq!(listing, vec!["kept".to_string()]);
    }

    #[tokio::test]
    async fn any_write_advances_the_shared_namespace_clock() {
        let dir = TempDir::new().unwrap();
        let mut cache = cache_in(&dir);
        cache
            .commits_or_fetch("a.md", TTL, || async { Ok(record("aaa", "aaa")) })
            .await
            .unwrap();

        // Expire the namespace, then write a different key.
        let ns = cache.document.namespaces.get_mut(NAMESPACE_COMMITS).unwrap();
        ns.cache_time = Utc::now().timestamp() - TTL.as_secs() as i64 - 1;
        cache
            .commits_or_fetch("b.md", TTL, || async { Ok(record("bbb", "bbb")) })
            .await
            .unwrap();

        // The write refreshed the shared clock, so the untouched key is
        // fresh again without a fetch.
        let kept = cache
            .commits_or_fetch("a.md", TTL, || async {
                panic!("namespace clock was advanced by the other write")
            })
            .await
            .unwrap();
        assert_eq!(kept, record("aaa", "aaa"));
    }

    #[tokio::test]
    async fn persists_across_store_instances() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.json");
        {
            let mut cache = MetadataCache::load_from(path.clone());
            cache
                .commits_or_fetch("a.md", TTL, || async { Ok(record("aaa", "bbb")) })
                .await
                .unwrap();
        }

        let mut reloaded = MetadataCache::load_from(path);
        let cached = reloaded
            .commits_or_fetch("a.md", TTL, || async {
                panic!("entry was persisted by the first instance")
            })
            .await
            .unwrap();
        assert_eq!(cached, record("aaa", "bbb"));
    }

    #[tokio::test]
    async fn corrupt_cache_file_cold_starts_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::write(&path, "{not json").unwrap();

        let mut cache = MetadataCache::load_from(path);
        let calls = Cell::new(0);
        cache
            .listing_or_fetch("docs/", TTL, || async {
                calls.set(calls.get() + 1);
                Ok(vec!["docs/a.md".to_string()])
            })
            .await
            .unwrap();
        assert_eq!(calls.get(), 1, "corrupt file must behave like an empty cache");
    }

    #[tokio::test]
    async fn wrong_payload_variant_is_treated_as_a_miss() {
        let dir = TempDir::new().unwrap();
        let mut cache = cache_in(&dir);

        // A listing stored under the commits namespace key, as a legacy or
        // hand-edited document could contain.
        cache.store(
            NAMESPACE_COMMITS,
            "a.md",
            CachePayload::Listing(vec!["docs/a.md".to_string()]),
            Utc::now().timestamp(),
        );

        let fetched = cache
            .commits_or_fetch("a.md", TTL, || async { Ok(record("ccc", "ccc")) })
            .await
            .unwrap();
        assert_eq!(fetched, record("ccc", "ccc"));
    }

    #[tokio::test]
    async fn independent_instances_do_not_interfere() {
        let dir = TempDir::new().unwrap();
        let mut first = MetadataCache::load_from(dir.path().join("one.json"));
        let mut second = MetadataCache::load_from(dir.path().join("two.json"));

        first
            .listing_or_fetch("docs/", TTL, || async { Ok(vec!["one".to_string()]) })
            .await
            .unwrap();
        let listing = second
            .listing_or_fetch("docs/", TTL, || async { Ok(vec!["two".to_string()]) })
            .await
            .unwrap();
        assert_eq!(listing, vec!["two".to_string()]);
    }

    #[tokio::test]
    async fn generic_get_or_fetch_round_trips_payloads() {
        let dir = TempDir::new().unwrap();
        let mut cache = cache_in(&dir);
        let payload = CachePayload::Listing(vec!["docs/x.md".to_string()]);
        let stored = cache
            .get_or_fetch(NAMESPACE_FILES, "k", TTL, || async {
                Ok(CachePayload::Listing(vec!["docs/x.md".to_string()]))
            })
            .await
            .unwrap();
        assert_eq!(stored, payload);
    }
}
