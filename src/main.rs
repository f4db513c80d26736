//! docaudit CLI entry point.
//!
//! Parses arguments, installs the logging subscriber, and executes the
//! selected command. Errors are printed with their context chain and turn
//! into a non-zero exit status.

use clap::Parser;
use colored::Colorize;
use docaudit::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    cli.init_logging();

    if let Err(err) = cli.execute().await {
        eprintln!("{} {err:#}", "error:".red().bold());
        std::process::exit(1);
    }
}
