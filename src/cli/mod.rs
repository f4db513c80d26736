//! Command-line interface for docaudit.
//!
//! Each command is a separate module with its own argument struct and an
//! async `execute` method; this module owns the root parser, the global
//! flags, and dispatch.
//!
//! ```bash
//! # Audit the mirror in the current directory (collection, then updates)
//! docaudit check
//!
//! # Machine-readable output, fail the build when anything is off
//! docaudit check --format json --gate
//!
//! # Inspect or drop the metadata cache
//! docaudit cache info
//! docaudit cache clean
//! ```

mod cache;
mod check;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Top-level CLI for the documentation mirror auditor.
#[derive(Parser)]
#[command(
    name = "docaudit",
    about = "Audit a documentation mirror against its upstream repository",
    version,
    long_about = "docaudit compares a locally collected documentation tree against the \
upstream repository it mirrors: which upstream files were never collected, and which \
collected files are stale relative to the commit recorded at collection time."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output.
    ///
    /// Equivalent to `RUST_LOG=debug`. Mutually exclusive with `--quiet`.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress everything except errors (for scripts and CI).
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the global configuration file.
    ///
    /// Defaults to `~/.docaudit/config.toml` (or `DOCAUDIT_CONFIG`).
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Run the collection audit, then the update audit.
    ///
    /// See [`check::CheckCommand`] for options and behavior.
    Check(check::CheckCommand),

    /// Inspect or clean the metadata cache file.
    ///
    /// See [`cache::CacheCommand`] for options and behavior.
    Cache(cache::CacheCommand),
}

impl Cli {
    /// Installs the tracing subscriber once, honoring the verbosity flags.
    ///
    /// `RUST_LOG` still wins at the default verbosity, so targeted filters
    /// keep working.
    pub fn init_logging(&self) {
        let filter = if self.verbose {
            EnvFilter::new("debug")
        } else if self.quiet {
            EnvFilter::new("error")
        } else {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
        };
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }

    /// Dispatches to the selected command.
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Check(cmd) => cmd.execute(self.config.as_deref()).await,
            Commands::Cache(cmd) => cmd.execute(self.config.as_deref()).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn verbose_and_quiet_conflict() {
        assert!(Cli::try_parse_from(["docaudit", "check", "--verbose", "--quiet"]).is_err());
    }

    #[test]
    fn parses_check_with_flags() {
        let cli = Cli::try_parse_from([
            "docaudit", "check", "--lenient", "--format", "json", "--gate",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Check(_)));
    }
}
