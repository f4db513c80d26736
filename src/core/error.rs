//! Error types for docaudit operations.
//!
//! The taxonomy is deliberately small. Remote lookup failures never surface
//! here - they are converted to null commit stamps at the source boundary
//! (see [`crate::remote`]). What remains is split between data-quality
//! failures that can stop a run (front matter) and environment failures
//! (home directory, configuration). Command-level code wraps these in
//! `anyhow` with context, matching the split between typed domain errors
//! and ad-hoc CLI errors.

use thiserror::Error;

/// Errors produced by the audit core.
#[derive(Error, Debug)]
pub enum AuditError {
    /// A translatable local file does not start with a front-matter block.
    #[error("front matter not found in {path}")]
    MissingFrontmatter {
        /// The offending local file.
        path: String,
    },

    /// The front-matter block exists but cannot be parsed as YAML, or is
    /// missing the required `collected_date` field.
    #[error("invalid front matter in {path}: {reason}")]
    InvalidFrontmatter {
        /// The offending local file.
        path: String,
        /// Parser detail, kept as text for display.
        reason: String,
    },

    /// The `collected_date` field is present but not a `YYYYMMDD` date.
    #[error("invalid collected_date '{value}' in {path}: expected YYYYMMDD")]
    InvalidCollectedDate {
        /// The offending local file.
        path: String,
        /// The raw value found in the front matter.
        value: String,
    },

    /// The user's home directory could not be determined, so neither the
    /// cache file nor the config file has a default location.
    #[error("unable to determine home directory")]
    NoHomeDirectory,

    /// A local file could not be read.
    #[error("failed to read {path}")]
    FileRead {
        /// The unreadable file.
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The global configuration file exists but is not valid TOML.
    #[error("invalid configuration in {path}: {reason}")]
    InvalidConfig {
        /// The offending config file.
        path: String,
        /// Parser detail, kept as text for display.
        reason: String,
    },
}
