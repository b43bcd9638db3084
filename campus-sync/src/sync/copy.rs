//! Bulk copy stage
//!
//! Rows travel as JSON objects: the source side serializes each row with
//! `row_to_json`, the target side inserts through `jsonb_populate_record`,
//! which matches columns by name against the table's row type. The column
//! list is taken from the first fetched row's key set; an empty source table
//! makes the stage a no-op.
//!
//! Rows are inserted one statement at a time in fixed-size batches, each
//! batch inside an explicit transaction. Any row failure rolls the batch
//! back and aborts the whole run; tables later in the list are left
//! unsynced.

use anyhow::{Context, Result, bail};
use serde_json::Value;
use sqlx::PgPool;

use crate::db::quote_ident;
use crate::tables::TableDescriptor;

/// Copy all rows of one table from source to target. Returns rows copied.
pub async fn copy_table(
    source: &PgPool,
    target: &PgPool,
    table: &TableDescriptor,
    batch_size: usize,
) -> Result<u64> {
    let fetch = fetch_statement(table);
    let table = table.name;
    let rows: Vec<String> = sqlx::query_scalar(&fetch)
        .fetch_all(source)
        .await
        .with_context(|| format!("Failed to fetch rows from source table '{}'", table))?;

    if rows.is_empty() {
        log::info!("Table '{}' is empty on the source, nothing to copy", table);
        return Ok(0);
    }

    let first: Value = serde_json::from_str(&rows[0])
        .with_context(|| format!("Source row from '{}' is not valid JSON", table))?;
    let columns = column_list(&first)
        .with_context(|| format!("Could not derive columns for '{}'", table))?;
    let insert = insert_statement(table, &columns);

    let mut copied: u64 = 0;
    for batch in rows.chunks(batch_size) {
        let mut tx = target
            .begin()
            .await
            .with_context(|| format!("Failed to begin transaction for '{}'", table))?;

        for row in batch {
            if let Err(e) = sqlx::query(&insert).bind(row.as_str()).execute(&mut *tx).await {
                tx.rollback().await.ok();
                return Err(e).with_context(|| {
                    format!(
                        "Insert into '{}' failed after {} rows; batch rolled back",
                        table, copied
                    )
                });
            }
        }

        tx.commit()
            .await
            .with_context(|| format!("Failed to commit batch for '{}'", table))?;
        copied += batch.len() as u64;
        log::debug!("Copied {}/{} rows of '{}'", copied, rows.len(), table);
    }

    log::info!("Copied {} rows into '{}'", copied, table);
    Ok(copied)
}

/// Source fetch statement: rows as JSON, ordered by the declared primary
/// key when the descriptor has one, else by the first column (stable, but
/// not necessarily key order).
pub fn fetch_statement(table: &TableDescriptor) -> String {
    let order = match table.primary_key {
        Some(pk) => quote_ident(pk),
        None => "1".to_string(),
    };
    format!(
        "SELECT row_to_json(t)::text FROM (SELECT * FROM {} ORDER BY {}) t",
        quote_ident(table.name),
        order
    )
}

/// Column names from the first row's key set.
pub fn column_list(first_row: &Value) -> Result<Vec<String>> {
    let Value::Object(map) = first_row else {
        bail!("Expected a JSON object, got: {}", first_row);
    };
    if map.is_empty() {
        bail!("Row has no columns");
    }
    Ok(map.keys().cloned().collect())
}

/// One-row insert statement matching JSON keys to table columns by name.
pub fn insert_statement(table: &str, columns: &[String]) -> String {
    let quoted = quote_ident(table);
    let cols = columns
        .iter()
        .map(|c| quote_ident(c))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO {table} ({cols}) SELECT {cols} FROM jsonb_populate_record(NULL::{table}, $1::jsonb)",
        table = quoted,
        cols = cols
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn descriptor(name: &'static str, primary_key: Option<&'static str>) -> TableDescriptor {
        TableDescriptor {
            name,
            primary_key,
            dependencies: &[],
        }
    }

    #[test]
    fn test_fetch_statement_orders_by_primary_key() {
        let sql = fetch_statement(&descriptor("course", Some("id")));
        assert_eq!(
            sql,
            "SELECT row_to_json(t)::text FROM (SELECT * FROM \"course\" ORDER BY \"id\") t"
        );
    }

    #[test]
    fn test_fetch_statement_falls_back_to_first_column() {
        let sql = fetch_statement(&descriptor("audit_log", None));
        assert!(sql.contains("ORDER BY 1"));
    }

    #[test]
    fn test_fetch_statement_quotes_reserved_user_table() {
        let sql = fetch_statement(&descriptor("user", Some("id")));
        assert!(sql.contains("FROM \"user\""));
    }

    #[test]
    fn test_column_list_from_row_object() {
        let row = json!({"id": 1, "name": "Engineering", "school_id": 4});
        let columns = column_list(&row).unwrap();

        assert_eq!(columns.len(), 3);
        assert!(columns.contains(&"id".to_string()));
        assert!(columns.contains(&"name".to_string()));
        assert!(columns.contains(&"school_id".to_string()));
    }

    #[test]
    fn test_column_list_rejects_non_object() {
        assert!(column_list(&json!([1, 2, 3])).is_err());
        assert!(column_list(&json!("row")).is_err());
    }

    #[test]
    fn test_column_list_rejects_empty_object() {
        assert!(column_list(&json!({})).is_err());
    }

    #[test]
    fn test_insert_statement_quotes_everything() {
        let sql = insert_statement("course", &["id".to_string(), "title".to_string()]);
        assert_eq!(
            sql,
            "INSERT INTO \"course\" (\"id\", \"title\") SELECT \"id\", \"title\" \
             FROM jsonb_populate_record(NULL::\"course\", $1::jsonb)"
        );
    }

    #[test]
    fn test_insert_statement_handles_reserved_user_table() {
        let sql = insert_statement("user", &["id".to_string()]);
        assert!(sql.contains("INSERT INTO \"user\""));
        assert!(sql.contains("NULL::\"user\""));
    }

    #[test]
    fn test_batch_chunking_covers_partial_final_batch() {
        let rows: Vec<u32> = (0..257).collect();
        let batches: Vec<&[u32]> = rows.chunks(100).collect();

        assert_eq!(batches.len(), 3);
        assert_eq!(batches[0].len(), 100);
        assert_eq!(batches[1].len(), 100);
        assert_eq!(batches[2].len(), 57);
        assert_eq!(batches.iter().map(|b| b.len()).sum::<usize>(), 257);
    }
}
