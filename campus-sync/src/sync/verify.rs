//! Verification stage
//!
//! Re-counts rows on both sides for every table in the list, whether or not
//! it had data. A count failure on either side is recorded as a missing
//! value and marks the entry unsynced; this stage never aborts. Overall
//! success requires every entry to match.

use serde::Serialize;
use sqlx::PgPool;

use crate::db;
use crate::tables::TableDescriptor;

/// One row of the final verification report
#[derive(Debug, Clone, Serialize)]
pub struct SyncSummaryEntry {
    pub table: String,
    /// None when the count itself failed (rendered as "Error")
    pub production_count: Option<i64>,
    pub local_count: Option<i64>,
    pub synced: bool,
}

impl SyncSummaryEntry {
    pub fn new(table: &str, production_count: Option<i64>, local_count: Option<i64>) -> Self {
        let synced = match (production_count, local_count) {
            (Some(p), Some(l)) => p == l,
            _ => false,
        };
        Self {
            table: table.to_string(),
            production_count,
            local_count,
            synced,
        }
    }
}

/// Count rows on both sides for every configured table.
pub async fn verify_all(
    source: &PgPool,
    target: &PgPool,
    tables: &[TableDescriptor],
) -> Vec<SyncSummaryEntry> {
    let mut entries = Vec::with_capacity(tables.len());

    for table in tables {
        let production_count = match db::count_rows(source, table.name).await {
            Ok(n) => Some(n),
            Err(e) => {
                log::warn!("Could not count '{}' on production: {:#}", table.name, e);
                None
            }
        };
        let local_count = match db::count_rows(target, table.name).await {
            Ok(n) => Some(n),
            Err(e) => {
                log::warn!("Could not count '{}' on local: {:#}", table.name, e);
                None
            }
        };

        entries.push(SyncSummaryEntry::new(table.name, production_count, local_count));
    }

    entries
}

/// Overall success: every single table matches.
pub fn all_synced(entries: &[SyncSummaryEntry]) -> bool {
    entries.iter().all(|e| e.synced)
}
