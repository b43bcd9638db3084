//! Command-line surface

pub mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "campus-sync")]
#[command(about = "Replicate the production campus database into a local one", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Set the log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    pub log: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full reconciliation: backup, clear, copy, repair, verify
    Sync {
        /// Skip the interactive confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
        /// Rows per insert transaction
        #[arg(
            long,
            default_value_t = crate::config::DEFAULT_BATCH_SIZE,
            value_parser = parse_batch_size
        )]
        batch_size: usize,
    },
    /// Compare the configured table list against the live source schema
    Validate {
        /// Emit the schema report as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Count rows on both sides and print the match report
    Verify {
        /// Emit the count report as JSON instead of the table
        #[arg(long)]
        json: bool,
    },
    /// Test connectivity to both databases
    Check,
}

/// A zero batch size would panic in the copy stage after the target table
/// has already been cleared, so reject it at the flag boundary.
fn parse_batch_size(raw: &str) -> Result<usize, String> {
    let n: usize = raw
        .parse()
        .map_err(|_| format!("'{}' is not a valid batch size", raw))?;
    if n == 0 {
        return Err("batch size must be at least 1".to_string());
    }
    Ok(n)
}

pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Sync { yes, batch_size } => commands::sync::run(yes, batch_size).await,
        Commands::Validate { json } => commands::validate::run(json).await,
        Commands::Verify { json } => commands::verify::run(json).await,
        Commands::Check => commands::check::run().await,
    }
}
