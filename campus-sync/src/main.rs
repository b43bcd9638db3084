//! campus-sync: production-to-local database reconciliation for the campus
//! administration system.
//!
//! Replicates the production Postgres database into a local one, table by
//! table in foreign-key dependency order: backup, clear, batched copy,
//! sequence repair, verification.

mod cli;
mod config;
mod db;
mod report;
mod sync;
mod tables;

use clap::Parser;

fn init_logging(level: &str) {
    // RUST_LOG takes precedence over the --log flag
    let env = env_logger::Env::default().default_filter_or(level);
    env_logger::Builder::from_env(env)
        .format_timestamp_secs()
        .init();
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = cli::Cli::parse();
    init_logging(&cli.log);

    if let Err(e) = cli::run(cli).await {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}
