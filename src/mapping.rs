//! Bidirectional path mapping between the local mirror and the upstream tree.
//!
//! Collected files live under a fixed local root (`sources/syzkaller/` by
//! default) that mirrors a fixed upstream root (`docs/`). Translating between
//! the two is a pure prefix substitution: no filesystem access, no
//! normalization beyond stripping a leading `./` on the local side.
//!
//! Paths that do not start with the expected prefix pass through unchanged.
//! That looseness is intentional - callers feed the mapper whole listings and
//! rely on non-mirror paths surviving the trip rather than erroring.

/// Translates paths between the local collected tree and the upstream tree.
///
/// Constructed once from settings and passed by reference to whichever
/// component needs it; it holds no state beyond the two prefixes.
#[derive(Debug, Clone)]
pub struct PathMapper {
    local_prefix: String,
    upstream_prefix: String,
}

impl PathMapper {
    /// Creates a mapper for the given local and upstream root prefixes.
    pub const fn new(local_prefix: String, upstream_prefix: String) -> Self {
        Self {
            local_prefix,
            upstream_prefix,
        }
    }

    /// Maps a local collected path to its upstream equivalent.
    ///
    /// A leading `./` is stripped before the prefix substitution so that
    /// scan results rooted at the current directory map cleanly.
    pub fn to_upstream(&self, path: &str) -> String {
        let path = path.strip_prefix("./").unwrap_or(path);
        match path.strip_prefix(&self.local_prefix) {
            Some(rest) => format!("{}{rest}", self.upstream_prefix),
            None => path.to_string(),
        }
    }

    /// Maps an upstream path to the local path where it would be collected.
    pub fn to_local(&self, path: &str) -> String {
        match path.strip_prefix(&self.upstream_prefix) {
            Some(rest) => format!("{}{rest}", self.local_prefix),
            None => path.to_string(),
        }
    }
}
