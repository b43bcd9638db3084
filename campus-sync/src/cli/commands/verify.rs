//! `campus-sync verify` — standalone count comparison, no data movement

use anyhow::{Context, Result};
use colored::Colorize;

use crate::config::SyncConfig;
use crate::db;
use crate::report;
use crate::sync::verify::{all_synced, verify_all};

pub async fn run(json: bool) -> Result<()> {
    let config = SyncConfig::from_env()?;

    let source = db::connect(&config.source).await?;
    let target = db::connect(&config.target).await?;

    let entries = verify_all(&source, &target, &config.tables).await;

    source.close().await;
    target.close().await;

    if json {
        let body = serde_json::to_string_pretty(&entries)
            .context("Failed to serialize the verification report")?;
        println!("{}", body);
        return Ok(());
    }

    report::print(&entries);
    if all_synced(&entries) {
        println!("{}", "All tables match.".green());
    } else {
        println!("{}", "Some tables did not match.".red());
    }

    Ok(())
}
