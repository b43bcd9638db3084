//! Pool construction and identifier quoting
//!
//! Both connection pools are owned exclusively by the running job and closed
//! on every exit path. All table and column name interpolation goes through
//! [`quote_ident`] so reserved identifiers (the `user` table) need no
//! per-call-site handling.

use anyhow::{Context, Result};
use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};

use crate::config::DbConfig;

/// Open a pool against one side of the sync. SSL is not negotiated; the
/// databases live on trusted networks.
pub async fn connect(cfg: &DbConfig) -> Result<PgPool> {
    let options = PgConnectOptions::new()
        .host(&cfg.host)
        .port(cfg.port)
        .username(&cfg.user)
        .password(&cfg.password)
        .database(&cfg.database)
        .ssl_mode(PgSslMode::Disable);

    PgPoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .with_context(|| format!("Failed to connect to {}", cfg.describe()))
}

/// Quote an SQL identifier. Always wraps in double quotes and doubles any
/// embedded quote, which makes reserved words like `user` safe everywhere.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Row count for a table, used by the backup, copy, and verify stages.
pub async fn count_rows(pool: &PgPool, table: &str) -> Result<i64> {
    let sql = format!("SELECT COUNT(*) FROM {}", quote_ident(table));
    sqlx::query_scalar(&sql)
        .fetch_one(pool)
        .await
        .with_context(|| format!("Failed to count rows in {}", table))
}

/// Server version string, used by the connectivity check.
pub async fn server_version(pool: &PgPool) -> Result<String> {
    sqlx::query_scalar("SELECT version()")
        .fetch_one(pool)
        .await
        .context("Failed to query server version")
}
