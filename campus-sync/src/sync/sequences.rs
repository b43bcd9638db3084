//! Sequence repair stage
//!
//! Runs once after all tables are copied. Every sequence in the target
//! schema is pointed at max(owning column), or 1 for an empty table, marked
//! already-consumed so the next insert continues past the copied rows. The
//! owning table/column is located by a LIKE match against column defaults.
//! Failures here are logged and skipped, never fatal.

use anyhow::{Context, Result};
use sqlx::PgPool;

use crate::db::quote_ident;

/// Tally of the repair pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SequenceRepair {
    pub repaired: usize,
    pub skipped: usize,
}

/// Repair every sequence in the target's public schema. Best-effort
/// throughout; enumeration failure skips the whole stage with a warning.
pub async fn repair_all(pool: &PgPool) -> SequenceRepair {
    let sequences: Vec<String> = match sqlx::query_scalar(
        "SELECT sequence_name FROM information_schema.sequences
         WHERE sequence_schema = 'public'
         ORDER BY sequence_name",
    )
    .fetch_all(pool)
    .await
    {
        Ok(names) => names,
        Err(e) => {
            log::warn!("Could not enumerate sequences, skipping repair: {}", e);
            return SequenceRepair::default();
        }
    };

    let mut tally = SequenceRepair::default();
    for sequence in &sequences {
        match repair_one(pool, sequence).await {
            Ok(true) => tally.repaired += 1,
            Ok(false) => tally.skipped += 1,
            Err(e) => {
                log::warn!("Failed to repair sequence '{}': {:#}", sequence, e);
                tally.skipped += 1;
            }
        }
    }

    log::info!(
        "Sequence repair: {} repaired, {} skipped",
        tally.repaired,
        tally.skipped
    );
    tally
}

/// Repair a single sequence. Returns false when no owning column was found.
async fn repair_one(pool: &PgPool, sequence: &str) -> Result<bool> {
    let owner: Option<(String, String)> = sqlx::query_as(
        "SELECT table_name, column_name FROM information_schema.columns
         WHERE table_schema = 'public' AND column_default LIKE $1",
    )
    .bind(format!("%{}%", sequence))
    .fetch_optional(pool)
    .await
    .context("Failed to locate owning column")?;

    let Some((table, column)) = owner else {
        log::debug!("No owning column found for sequence '{}'", sequence);
        return Ok(false);
    };

    let sql = format!(
        "SELECT setval($1::regclass, GREATEST(COALESCE(MAX({}), 1), 1), true) FROM {}",
        quote_ident(&column),
        quote_ident(&table)
    );
    sqlx::query(&sql)
        .bind(sequence)
        .execute(pool)
        .await
        .with_context(|| format!("setval failed for '{}.{}'", table, column))?;

    log::debug!(
        "Sequence '{}' set to max({}.{})",
        sequence,
        table,
        column
    );
    Ok(true)
}
