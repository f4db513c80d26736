//! Boundary to the upstream repository's metadata.
//!
//! Everything the audits know about the upstream tree comes through the
//! [`RemoteSource`] trait: a recursive file listing and an "as-of" commit
//! lookup. The production implementation is [`GithubClient`]; tests substitute
//! an in-memory fake. Keeping the trait this narrow is what makes the cache
//! layer the only place that ever decides whether a remote call happens.
//!
//! # Failure semantics
//!
//! The two operations fail differently, on purpose:
//!
//! - [`list_tree`](RemoteSource::list_tree) propagates client errors. A
//!   listing failure means the collection audit has nothing to work with,
//!   so the caller sees the error.
//! - [`commit_as_of`](RemoteSource::commit_as_of) never fails past this
//!   boundary. Any lookup problem (HTTP error, no commits touching the path)
//!   is logged and collapsed into a null [`CommitStamp`]. Lookups are not
//!   retried.

pub mod github;

pub use github::GithubClient;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The commit in effect for a path at some instant.
///
/// Both fields are `None` when the lookup failed or no commit touched the
/// path before the instant. The date is preformatted for display and cache
/// storage (see [`crate::constants::COMMIT_DATE_FORMAT`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitStamp {
    /// Full commit SHA, if the lookup succeeded.
    pub sha: Option<String>,
    /// Author date of that commit, if it could be resolved.
    pub date: Option<String>,
}

impl CommitStamp {
    /// The null stamp returned for failed lookups.
    pub const fn missing() -> Self {
        Self {
            sha: None,
            date: None,
        }
    }

    /// Whether this stamp carries no commit identifier.
    pub fn is_missing(&self) -> bool {
        self.sha.is_none()
    }
}

/// Cached commit metadata for one collected file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCommitRecord {
    /// The upstream commit in effect at the recorded collection date.
    pub collected: CommitStamp,
    /// The upstream commit in effect as of the check time.
    pub latest: CommitStamp,
}

/// Read-only access to upstream repository metadata.
///
/// Callers await these sequentially and never spawn them, so the returned
/// futures do not need to be `Send`.
#[allow(async_fn_in_trait)]
pub trait RemoteSource {
    /// Lists all files under `root`, recursively, in traversal order.
    ///
    /// Directories whose full path appears in `exclude_dirs` are pruned, not
    /// descended. The order is whatever the remote returns per directory and
    /// is not guaranteed stable across calls.
    async fn list_tree(&self, root: &str, exclude_dirs: &[String]) -> Result<Vec<String>>;

    /// Finds the most recent commit touching `path` authored at or before
    /// `instant`, along with that commit's author date.
    ///
    /// Returns [`CommitStamp::missing`] on any failure; never errors.
    async fn commit_as_of(&self, path: &str, instant: DateTime<Utc>) -> CommitStamp;
}
