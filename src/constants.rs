//! Fixed defaults used throughout the docaudit codebase.
//!
//! These reproduce the conventions of the syzkaller documentation mirror
//! this tool was built for. All of them can be overridden through the
//! global configuration file or command-line flags; defining them centrally
//! keeps the magic values discoverable.

use std::time::Duration;

/// Upstream repository the mirror is collected from, as `owner/repo`.
pub const DEFAULT_REPOSITORY: &str = "google/syzkaller";

/// Root of the documentation tree inside the upstream repository.
pub const DEFAULT_UPSTREAM_ROOT: &str = "docs/";

/// Root of the collected tree inside the local project.
pub const DEFAULT_LOCAL_ROOT: &str = "sources/syzkaller/";

/// Upstream directories that are never collected (pruned from listings).
pub fn default_exclude_dirs() -> Vec<String> {
    vec!["docs/translations".to_string()]
}

/// Upstream file extensions that do not need a local counterpart.
pub fn default_skip_extensions() -> Vec<String> {
    [".drawio", ".patch", ".sh", ".py"].map(String::from).to_vec()
}

/// Local file suffixes that carry translatable content and front matter.
pub fn default_translatable_suffixes() -> Vec<String> {
    [".md", ".txt"].map(String::from).to_vec()
}

/// How long cached remote metadata stays valid (3 days).
pub const CACHE_TTL: Duration = Duration::from_secs(86_400 * 3);

/// Format of the `collected_date` front-matter field.
pub const COLLECTED_DATE_FORMAT: &str = "%Y%m%d";

/// Format used for commit author dates in cache records and reports.
pub const COMMIT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Environment variable overriding the cache file location.
pub const CACHE_FILE_ENV: &str = "DOCAUDIT_CACHE_FILE";

/// Environment variable overriding the global config file location.
pub const CONFIG_FILE_ENV: &str = "DOCAUDIT_CONFIG";

/// Environment variable consulted for the GitHub API token when no
/// explicit token is configured.
pub const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";
