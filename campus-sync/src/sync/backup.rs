//! Backup-and-clear stage
//!
//! Before a table is overwritten, any existing target rows are snapshotted
//! into a timestamped shadow table. Backup is best-effort: a failure is
//! logged and the run continues. Clearing is not: TRUNCATE falls back to
//! DELETE, and if the fallback also fails the error propagates and aborts
//! the run. Backup tables are never deleted by the job; the operator cleans
//! them up manually.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::db::{self, quote_ident};

/// What happened to the pre-sync contents of a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupOutcome {
    /// Rows were snapshotted into the named shadow table
    Created(String),
    /// Target table had no rows, nothing to back up
    Empty,
    /// Snapshot failed; logged, run continues (data-loss risk accepted)
    Failed,
}

/// How a table was cleared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearMethod {
    Truncated,
    Deleted,
}

/// Shadow table name with a millisecond UTC timestamp suffix.
pub fn backup_name(table: &str, at: DateTime<Utc>) -> String {
    format!("{}_backup_{}", table, at.timestamp_millis())
}

/// Snapshot existing target rows into a shadow table. Best-effort.
pub async fn backup_table(pool: &PgPool, table: &str) -> BackupOutcome {
    let count = match db::count_rows(pool, table).await {
        Ok(n) => n,
        Err(e) => {
            log::warn!("Skipping backup of '{}': {:#}", table, e);
            return BackupOutcome::Failed;
        }
    };

    if count == 0 {
        log::debug!("Table '{}' is empty on the target, no backup needed", table);
        return BackupOutcome::Empty;
    }

    let shadow = backup_name(table, Utc::now());
    let sql = format!(
        "CREATE TABLE {} AS SELECT * FROM {}",
        quote_ident(&shadow),
        quote_ident(table)
    );

    match sqlx::query(&sql).execute(pool).await {
        Ok(_) => {
            log::info!("Backed up {} rows of '{}' into '{}'", count, table, shadow);
            BackupOutcome::Created(shadow)
        }
        Err(e) => {
            log::warn!("Failed to back up '{}': {}", table, e);
            BackupOutcome::Failed
        }
    }
}

/// Empty the live table. TRUNCATE first; DELETE as fallback; error only if
/// both fail.
pub async fn clear_table(pool: &PgPool, table: &str) -> Result<ClearMethod> {
    let truncate = format!(
        "TRUNCATE TABLE {} RESTART IDENTITY CASCADE",
        quote_ident(table)
    );

    match sqlx::query(&truncate).execute(pool).await {
        Ok(_) => {
            log::debug!("Truncated '{}'", table);
            Ok(ClearMethod::Truncated)
        }
        Err(e) => {
            log::warn!("TRUNCATE failed on '{}' ({}), falling back to DELETE", table, e);
            let delete = format!("DELETE FROM {}", quote_ident(table));
            sqlx::query(&delete)
                .execute(pool)
                .await
                .with_context(|| format!("Failed to clear table '{}'", table))?;
            Ok(ClearMethod::Deleted)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_backup_name_uses_millisecond_timestamp() {
        let at = Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap();
        assert_eq!(backup_name("course", at), "course_backup_1773480413000");
    }

    #[test]
    fn test_backup_name_for_reserved_word_table() {
        let at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        assert_eq!(backup_name("user", at), "user_backup_1700000000123");
    }
}
