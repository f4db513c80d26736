//! Front-matter handling for collected files.

pub mod frontmatter;

pub use frontmatter::{CollectedFrontmatter, FrontmatterReader};
