//! `campus-sync validate` — advisory schema check against the source

use anyhow::{Context, Result};
use colored::Colorize;

use crate::config::SyncConfig;
use crate::db;
use crate::sync::validate::validate_tables;

pub async fn run(json: bool) -> Result<()> {
    let config = SyncConfig::from_env()?;

    let source = db::connect(&config.source).await?;
    let result = validate_tables(&source, &config.tables).await;
    source.close().await;
    let schema = result?;

    if json {
        let body = serde_json::to_string_pretty(&schema)
            .context("Failed to serialize the schema report")?;
        println!("{}", body);
        return Ok(());
    }

    if schema.is_clean() {
        println!(
            "{}",
            "Configured table list matches the source schema.".green()
        );
        return Ok(());
    }

    for name in &schema.missing_from_config {
        println!(
            "{} source table '{}' is not in the sync list and will never be copied",
            "warning:".yellow(),
            name
        );
    }
    for name in &schema.missing_from_source {
        println!(
            "{} configured table '{}' does not exist on the source",
            "warning:".yellow(),
            name
        );
    }

    Ok(())
}
