//! Table dependency list for the campus administration schema
//!
//! The list is hand-ordered: every table's dependencies appear earlier in the
//! sequence, so copying in list order never violates a foreign key. The
//! invariant is asserted by [`validate_order`] at job start rather than
//! computed; whoever edits this list keeps it consistent.

use anyhow::{Result, bail};
use std::collections::HashSet;

/// One table in the sync sequence
#[derive(Debug, Clone)]
pub struct TableDescriptor {
    pub name: &'static str,
    pub primary_key: Option<&'static str>,
    /// Tables this one holds foreign keys into; all must precede it
    pub dependencies: &'static [&'static str],
}

impl TableDescriptor {
    const fn new(
        name: &'static str,
        primary_key: Option<&'static str>,
        dependencies: &'static [&'static str],
    ) -> Self {
        Self {
            name,
            primary_key,
            dependencies,
        }
    }
}

/// The curated table list for the campus administration database.
///
/// `user` is a reserved identifier in Postgres; every statement built from
/// this list runs the name through `quote_ident`.
pub fn campus_tables() -> Vec<TableDescriptor> {
    vec![
        TableDescriptor::new("system_config", Some("id"), &[]),
        TableDescriptor::new("role", Some("id"), &[]),
        TableDescriptor::new("user", Some("id"), &["role"]),
        TableDescriptor::new("school", Some("id"), &[]),
        TableDescriptor::new("program", Some("id"), &["school"]),
        TableDescriptor::new("faculty", Some("id"), &["school", "user"]),
        TableDescriptor::new("student", Some("id"), &["program", "user"]),
        TableDescriptor::new("venue", Some("id"), &[]),
        TableDescriptor::new("course", Some("id"), &["program", "faculty"]),
        TableDescriptor::new("slot", Some("id"), &["course", "venue", "faculty"]),
        TableDescriptor::new("coordinator", Some("id"), &["program", "faculty"]),
        TableDescriptor::new("course_registration", Some("id"), &["student", "course"]),
        TableDescriptor::new("attendance", Some("id"), &["student", "slot"]),
    ]
}

/// Assert the topological invariant over a table list: no duplicate names,
/// and every dependency satisfied by an earlier entry.
pub fn validate_order(tables: &[TableDescriptor]) -> Result<()> {
    let mut seen: HashSet<&str> = HashSet::new();

    for table in tables {
        for dep in table.dependencies {
            if !seen.contains(dep) {
                bail!(
                    "Table '{}' depends on '{}' which does not precede it in the sync list",
                    table.name,
                    dep
                );
            }
        }
        if !seen.insert(table.name) {
            bail!("Table '{}' appears twice in the sync list", table.name);
        }
    }

    Ok(())
}
