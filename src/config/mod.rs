//! Global configuration for docaudit.
//!
//! Settings live in a TOML file at `~/.docaudit/config.toml` (override the
//! location with `DOCAUDIT_CONFIG` or `--config`). Every field is optional;
//! the defaults in [`crate::constants`] reproduce the syzkaller mirror
//! conventions the tool was written for. Command-line flags win over the
//! file, and the API token falls back to the `GITHUB_TOKEN` environment
//! variable - tokens belong in the global config or the environment, never
//! in a project tree.
//!
//! ```toml
//! # ~/.docaudit/config.toml
//! repository = "google/syzkaller"
//! local_root = "sources/syzkaller/"
//! upstream_root = "docs/"
//! exclude_dirs = ["docs/translations"]
//! # github_token = "ghp_xxxxxxxxxxxx"   # never commit this file with a token
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::constants::{
    CACHE_TTL, CONFIG_FILE_ENV, DEFAULT_LOCAL_ROOT, DEFAULT_REPOSITORY, DEFAULT_UPSTREAM_ROOT,
    GITHUB_TOKEN_ENV, default_exclude_dirs, default_skip_extensions,
    default_translatable_suffixes,
};
use crate::core::AuditError;

/// Resolved settings for one invocation.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Upstream repository as `owner/repo`.
    pub repository: String,
    /// API token; falls back to `GITHUB_TOKEN` when unset.
    pub github_token: Option<String>,
    /// Root of the documentation tree in the upstream repository.
    pub upstream_root: String,
    /// Root of the collected tree, relative to the project directory.
    pub local_root: String,
    /// Upstream directories pruned from listings.
    pub exclude_dirs: Vec<String>,
    /// Upstream extensions that never need collection.
    pub skip_extensions: Vec<String>,
    /// Local suffixes that carry front matter and get staleness checks.
    pub translatable_suffixes: Vec<String>,
    /// Cache validity window in seconds.
    pub cache_ttl_secs: u64,
    /// Cache file location override.
    pub cache_file: Option<PathBuf>,
    /// Project directory the audits run against. Set from the command line,
    /// not the config file.
    #[serde(skip)]
    pub project_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            repository: DEFAULT_REPOSITORY.to_string(),
            github_token: None,
            upstream_root: DEFAULT_UPSTREAM_ROOT.to_string(),
            local_root: DEFAULT_LOCAL_ROOT.to_string(),
            exclude_dirs: default_exclude_dirs(),
            skip_extensions: default_skip_extensions(),
            translatable_suffixes: default_translatable_suffixes(),
            cache_ttl_secs: CACHE_TTL.as_secs(),
            cache_file: None,
            project_dir: PathBuf::from("."),
        }
    }
}

impl Settings {
    /// Loads settings from `path`, or from the default location when `None`.
    ///
    /// A missing file yields the defaults; a file that exists but does not
    /// parse is an error (a half-read config silently auditing the wrong
    /// tree would be worse than failing).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::default_path()?,
        };
        if !path.exists() {
            debug!("no config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let settings = toml::from_str(&text).map_err(|err| AuditError::InvalidConfig {
            path: path.display().to_string(),
            reason: err.to_string(),
        })?;
        debug!("loaded config from {}", path.display());
        Ok(settings)
    }

    /// Default config file location: `~/.docaudit/config.toml`, overridable
    /// with the `DOCAUDIT_CONFIG` environment variable.
    pub fn default_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_FILE_ENV) {
            return Ok(PathBuf::from(path));
        }
        let home = dirs::home_dir().ok_or(AuditError::NoHomeDirectory)?;
        Ok(home.join(".docaudit").join("config.toml"))
    }

    /// The API token to use: the configured one, else `GITHUB_TOKEN`.
    pub fn token(&self) -> Option<String> {
        self.github_token
            .clone()
            .or_else(|| std::env::var(GITHUB_TOKEN_ENV).ok())
    }

    /// Cache validity window.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}
