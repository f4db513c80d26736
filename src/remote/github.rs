//! GitHub REST implementation of the remote metadata source.
//!
//! Uses two endpoints of the v3 API:
//!
//! - `GET /repos/{repo}/contents/{path}` to walk the directory tree
//!   breadth-first (one request per directory).
//! - `GET /repos/{repo}/commits?path=...&until=...&per_page=1` to resolve
//!   the commit in effect for a path as of an instant. The commit's author
//!   date comes back in the same response, so a lookup is a single request.
//!
//! Requests carry a `User-Agent` (GitHub rejects anonymous agents) and an
//! optional bearer token. There is no retry or backoff; unauthenticated use
//! runs into the 60-requests-per-hour rate limit quickly, which is the main
//! reason the metadata cache in front of this client exists.

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;
use std::collections::VecDeque;
use tracing::{debug, warn};

use crate::constants::COMMIT_DATE_FORMAT;
use crate::remote::{CommitStamp, RemoteSource};

const API_BASE: &str = "https://api.github.com";

/// GitHub-backed [`RemoteSource`].
#[derive(Debug, Clone)]
pub struct GithubClient {
    repo: String,
    token: Option<String>,
    http: reqwest::Client,
}

/// One entry of a `contents` response.
#[derive(Debug, Deserialize)]
struct ContentEntry {
    path: String,
    #[serde(rename = "type")]
    kind: String,
}

/// One entry of a `commits` response. Only the fields the audit needs.
#[derive(Debug, Deserialize)]
struct CommitEntry {
    sha: String,
    commit: CommitDetail,
}

#[derive(Debug, Deserialize)]
struct CommitDetail {
    author: Option<CommitSignature>,
}

#[derive(Debug, Deserialize)]
struct CommitSignature {
    date: DateTime<Utc>,
}

impl GithubClient {
    /// Creates a client for `owner/repo` with an optional API token.
    pub fn new(repo: String, token: Option<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("docaudit/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { repo, token, http })
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        let request = self
            .http
            .get(url)
            .header("Accept", "application/vnd.github+json");
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Fetches the immediate contents of one directory.
    async fn contents(&self, dir: &str) -> Result<Vec<ContentEntry>> {
        let url = format!(
            "{API_BASE}/repos/{}/contents/{}",
            self.repo,
            dir.trim_end_matches('/')
        );
        debug!("GET {url}");
        let response = self
            .get(&url)
            .send()
            .await
            .with_context(|| format!("failed to list {dir} in {}", self.repo))?
            .error_for_status()
            .with_context(|| format!("failed to list {dir} in {}", self.repo))?;
        response
            .json()
            .await
            .with_context(|| format!("unexpected contents response for {dir}"))
    }

    /// The fallible half of [`commit_as_of`](RemoteSource::commit_as_of).
    async fn lookup_commit(&self, path: &str, instant: DateTime<Utc>) -> Result<Option<CommitStamp>> {
        let url = format!("{API_BASE}/repos/{}/commits", self.repo);
        let until = instant.to_rfc3339_opts(SecondsFormat::Secs, true);
        debug!("GET {url}?path={path}&until={until}");
        let response = self
            .get(&url)
            .query(&[("path", path), ("until", until.as_str()), ("per_page", "1")])
            .send()
            .await?
            .error_for_status()?;
        let commits: Vec<CommitEntry> = response.json().await?;
        Ok(commits.into_iter().next().map(|entry| CommitStamp {
            sha: Some(entry.sha),
            date: entry
                .commit
                .author
                .map(|author| author.date.format(COMMIT_DATE_FORMAT).to_string()),
        }))
    }
}

impl RemoteSource for GithubClient {
    async fn list_tree(&self, root: &str, exclude_dirs: &[String]) -> Result<Vec<String>> {
        let mut files = Vec::new();
        let mut queue = VecDeque::from([root.to_string()]);
        while let Some(dir) = queue.pop_front() {
            for entry in self.contents(&dir).await? {
                if entry.kind == "dir" {
                    if exclude_dirs.iter().any(|excluded| *excluded == entry.path) {
                        debug!("pruning excluded directory {}", entry.path);
                    } else {
                        queue.push_back(entry.path);
                    }
                } else {
                    files.push(entry.path);
                }
            }
        }
        debug!("listed {} files under {}/{root}", files.len(), self.repo);
        Ok(files)
    }

    async fn commit_as_of(&self, path: &str, instant: DateTime<Utc>) -> CommitStamp {
        match self.lookup_commit(path, instant).await {
            Ok(Some(stamp)) => stamp,
            Ok(None) => {
                warn!("no commit found for {path} until {instant}");
                CommitStamp::missing()
            }
            Err(err) => {
                warn!("failed to resolve commit for {path} until {instant}: {err:#}");
                CommitStamp::missing()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_contents_entries() {
        let body = r#"[
            {"name": "setup.md", "path": "docs/setup.md", "sha": "x", "type": "file"},
            {"name": "translations", "path": "docs/translations", "sha": "y", "type": "dir"}
        ]"#;
        let entries: Vec<ContentEntry> = serde_json::from_str(body).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].path, "docs/setup.md");
        assert_eq!(entries[0].kind, "file");
        assert_eq!(entries[1].kind, "dir");
    }

    #[test]
    fn deserializes_commit_entries_and_formats_dates() {
        let body = r#"[{
            "sha": "4b825dc642cb6eb9a060e54bf8d69288fbee4904",
            "commit": {"author": {"name": "a", "date": "2024-03-15T09:30:00Z"}}
        }]"#;
        let commits: Vec<CommitEntry> = serde_json::from_str(body).unwrap();
        let entry = &commits[0];
        assert_eq!(entry.sha, "4b825dc642cb6eb9a060e54bf8d69288fbee4904");
        let date = entry.commit.author.as_ref().unwrap().date;
        assert_eq!(date.format(COMMIT_DATE_FORMAT).to_string(), "2024-03-15 09:30:00");
    }

    #[test]
    fn tolerates_commits_without_author() {
        let body = r#"[{"sha": "abc123", "commit": {"author": null}}]"#;
        let commits: Vec<CommitEntry> = serde_json::from_str(body).unwrap();
        assert!(commits[0].commit.author.is_none());
    }
}
