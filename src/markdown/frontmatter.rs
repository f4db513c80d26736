//! Extraction of the collection front matter embedded in mirrored files.
//!
//! Every collected file starts with a YAML front-matter block delimited by
//! `---` lines:
//!
//! ```text
//! ---
//! collected_date: 20240315
//! translator: someone
//! ---
//! # Original document content
//! ```
//!
//! The embedding contract (block at file start, fixed delimiter) is owned
//! here; the YAML syntax itself is delegated to `gray_matter`'s YAML engine
//! plus `serde_yaml`, and unknown fields are ignored. The only field the
//! audit needs is `collected_date`, a `YYYYMMDD` value that authors write
//! either quoted or as a bare number - both forms are accepted.

use chrono::NaiveDate;
use gray_matter::Matter;
use gray_matter::engine::YAML;
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::path::Path;

use crate::constants::COLLECTED_DATE_FORMAT;
use crate::core::AuditError;

/// Parsed front matter of one collected file.
#[derive(Debug, Clone, Deserialize)]
pub struct CollectedFrontmatter {
    /// The date the file was copied from upstream, as `YYYYMMDD`.
    #[serde(deserialize_with = "string_or_number")]
    pub collected_date: String,
}

impl CollectedFrontmatter {
    /// Parses `collected_date` as a calendar date.
    pub fn collected_date(&self, path: &Path) -> Result<NaiveDate, AuditError> {
        NaiveDate::parse_from_str(&self.collected_date, COLLECTED_DATE_FORMAT).map_err(|_| {
            AuditError::InvalidCollectedDate {
                path: path.display().to_string(),
                value: self.collected_date.clone(),
            }
        })
    }
}

/// Accepts `collected_date: 20240315` and `collected_date: "20240315"`.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct Visitor;

    impl serde::de::Visitor<'_> for Visitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a YYYYMMDD string or integer")
        }

        fn visit_str<E: serde::de::Error>(self, value: &str) -> Result<String, E> {
            Ok(value.to_string())
        }

        fn visit_i64<E: serde::de::Error>(self, value: i64) -> Result<String, E> {
            Ok(value.to_string())
        }

        fn visit_u64<E: serde::de::Error>(self, value: u64) -> Result<String, E> {
            Ok(value.to_string())
        }
    }

    deserializer.deserialize_any(Visitor)
}

/// Reads front matter from collected files.
pub struct FrontmatterReader {
    matter: Matter<YAML>,
}

impl Default for FrontmatterReader {
    fn default() -> Self {
        Self::new()
    }
}

impl FrontmatterReader {
    pub fn new() -> Self {
        Self {
            matter: Matter::new(),
        }
    }

    /// Extracts and parses the front matter of `path`.
    ///
    /// Fails when the file is unreadable, has no front-matter block at the
    /// start, or the block lacks a usable `collected_date`. Whether that
    /// failure stops the whole run is the caller's policy decision.
    pub fn read(&self, path: &Path) -> Result<CollectedFrontmatter, AuditError> {
        let content = std::fs::read_to_string(path).map_err(|source| AuditError::FileRead {
            path: path.display().to_string(),
            source,
        })?;
        self.parse(&content, path)
    }

    fn parse(&self, content: &str, path: &Path) -> Result<CollectedFrontmatter, AuditError> {
        let parsed = self
            .matter
            .parse::<serde_yaml::Value>(content)
            .map_err(|err| AuditError::InvalidFrontmatter {
                path: path.display().to_string(),
                reason: err.to_string(),
            })?;
        let data = parsed.data.ok_or_else(|| AuditError::MissingFrontmatter {
            path: path.display().to_string(),
        })?;
        serde_yaml::from_value(data).map_err(|err| AuditError::InvalidFrontmatter {
            path: path.display().to_string(),
            reason: err.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn file_with(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn reads_quoted_collected_date() {
        let file = file_with("---\ncollected_date: \"20240315\"\n---\n# Doc\n");
        let fm = FrontmatterReader::new().read(file.path()).unwrap();
        assert_eq!(fm.collected_date, "20240315");
        let date = fm.collected_date(file.path()).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
    }

    #[test]
    fn reads_bare_numeric_collected_date() {
        let file = file_with("---\ncollected_date: 20240315\ntranslator: me\n---\nbody\n");
        let fm = FrontmatterReader::new().read(file.path()).unwrap();
        assert_eq!(fm.collected_date, "20240315");
    }

    #[test]
    fn missing_block_is_an_error() {
        let file = file_with("# Just a document\n\nNo front matter here.\n");
        let err = FrontmatterReader::new().read(file.path()).unwrap_err();
        assert!(matches!(err, AuditError::MissingFrontmatter { .. }));
    }

    #[test]
    fn missing_collected_date_is_an_error() {
        let file = file_with("---\ntranslator: me\n---\nbody\n");
        let err = FrontmatterReader::new().read(file.path()).unwrap_err();
        assert!(matches!(err, AuditError::InvalidFrontmatter { .. }));
    }

    #[test]
    fn malformed_date_fails_date_parsing() {
        let file = file_with("---\ncollected_date: 2024-03-15\n---\nbody\n");
        let fm = FrontmatterReader::new().read(file.path()).unwrap();
        let err = fm.collected_date(file.path()).unwrap_err();
        assert!(matches!(err, AuditError::InvalidCollectedDate { .. }));
    }
}
