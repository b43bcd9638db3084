//! Schema validator (advisory)
//!
//! Compares the configured table list against the live set of base tables on
//! the source. Both directions of drift are reported as warnings; neither
//! blocks the run. A production table missing from the list is never copied,
//! so the warning is the operator's only signal.

use anyhow::{Context, Result};
use serde::Serialize;
use sqlx::PgPool;

use crate::tables::TableDescriptor;

/// Result of comparing the configured list against the live source schema
#[derive(Debug, Clone, Serialize)]
pub struct SchemaReport {
    /// Base tables present on the source but absent from the configured list
    /// (risk: silently never synced)
    pub missing_from_config: Vec<String>,
    /// Configured tables absent from the source (stale configuration)
    pub missing_from_source: Vec<String>,
}

impl SchemaReport {
    pub fn is_clean(&self) -> bool {
        self.missing_from_config.is_empty() && self.missing_from_source.is_empty()
    }
}

/// Fetch the live base-table set from the source and diff it against the
/// configured list. Warnings only; never aborts.
pub async fn validate_tables(pool: &PgPool, tables: &[TableDescriptor]) -> Result<SchemaReport> {
    let live: Vec<String> = sqlx::query_scalar(
        "SELECT table_name FROM information_schema.tables
         WHERE table_schema = 'public' AND table_type = 'BASE TABLE'
         ORDER BY table_name",
    )
    .fetch_all(pool)
    .await
    .context("Failed to list base tables on the source database")?;

    let report = diff_tables(&live, tables);

    for name in &report.missing_from_config {
        log::warn!(
            "Source table '{}' is not in the sync list and will not be copied",
            name
        );
    }
    for name in &report.missing_from_source {
        log::warn!(
            "Configured table '{}' does not exist on the source database",
            name
        );
    }

    Ok(report)
}

/// Pure set-difference over table names, both directions, sorted.
pub fn diff_tables(live: &[String], configured: &[TableDescriptor]) -> SchemaReport {
    let mut missing_from_config: Vec<String> = live
        .iter()
        .filter(|name| !configured.iter().any(|t| t.name == name.as_str()))
        .cloned()
        .collect();
    missing_from_config.sort();

    let mut missing_from_source: Vec<String> = configured
        .iter()
        .filter(|t| !live.iter().any(|name| name == t.name))
        .map(|t| t.name.to_string())
        .collect();
    missing_from_source.sort();

    SchemaReport {
        missing_from_config,
        missing_from_source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::TableDescriptor;

    fn descriptor(name: &'static str) -> TableDescriptor {
        TableDescriptor {
            name,
            primary_key: Some("id"),
            dependencies: &[],
        }
    }

    #[test]
    fn test_matching_sets_are_clean() {
        let live = vec!["course".to_string(), "school".to_string()];
        let configured = vec![descriptor("school"), descriptor("course")];

        let report = diff_tables(&live, &configured);
        assert!(report.is_clean());
    }

    #[test]
    fn test_live_table_missing_from_config() {
        let live = vec!["course".to_string(), "grade".to_string()];
        let configured = vec![descriptor("course")];

        let report = diff_tables(&live, &configured);
        assert_eq!(report.missing_from_config, vec!["grade"]);
        assert!(report.missing_from_source.is_empty());
        assert!(!report.is_clean());
    }

    #[test]
    fn test_configured_table_missing_from_source() {
        let live = vec!["course".to_string()];
        let configured = vec![descriptor("course"), descriptor("venue")];

        let report = diff_tables(&live, &configured);
        assert!(report.missing_from_config.is_empty());
        assert_eq!(report.missing_from_source, vec!["venue"]);
    }

    #[test]
    fn test_report_serializes_for_json_output() {
        let live = vec!["course".to_string(), "grade".to_string()];
        let configured = vec![descriptor("course"), descriptor("venue")];

        let json = serde_json::to_string(&diff_tables(&live, &configured)).unwrap();
        assert!(json.contains("\"missing_from_config\":[\"grade\"]"));
        assert!(json.contains("\"missing_from_source\":[\"venue\"]"));
    }

    #[test]
    fn test_diffs_are_sorted() {
        let live = vec!["zeta".to_string(), "alpha".to_string()];
        let configured = vec![descriptor("course")];

        let report = diff_tables(&live, &configured);
        assert_eq!(report.missing_from_config, vec!["alpha", "zeta"]);
    }
}
