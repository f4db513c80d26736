//! docaudit - audit a documentation mirror against its upstream repository.
//!
//! A documentation mirror collects files from an upstream repository
//! (by default the syzkaller `docs/` tree) into a local project, stamping
//! each copy with a `collected_date` in its YAML front matter. This crate
//! answers the two questions such a mirror keeps raising:
//!
//! - **Collection**: which upstream files have never been copied locally?
//! - **Updates**: which local copies are stale, i.e. the upstream file has
//!   commits newer than the one in effect at collection time?
//!
//! Both checks run off remote metadata (directory listings and per-file
//! commit history) that is expensive to fetch and aggressively rate-limited,
//! so everything is read through a persistent TTL cache - the heart of the
//! crate.
//!
//! # Core modules
//!
//! - [`cache`] - persistent, TTL-scoped metadata cache (single JSON file)
//! - [`remote`] - the upstream metadata boundary and its GitHub client
//! - [`audit`] - the collection and staleness audits
//! - [`mapping`] - local/upstream path translation
//! - [`markdown`] - front-matter extraction for collected files
//!
//! # Supporting modules
//!
//! - [`cli`] - command-line interface (`check`, `cache`)
//! - [`config`] - global configuration (`~/.docaudit/config.toml`)
//! - [`constants`] - mirror conventions and fixed defaults
//! - [`core`] - shared error types
//!
//! # Example
//!
//! ```bash
//! # In the mirror project root:
//! docaudit check
//!
//! # CI gate with machine-readable output:
//! docaudit check --format json --gate
//! ```

pub mod audit;
pub mod cache;
pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod mapping;
pub mod markdown;
pub mod remote;
