//! Console verification report
//!
//! Fixed-width bordered table: `Table Name` 20 columns, `Production` 12,
//! `Local` 12, then status. Human-readable output, not a machine contract.

use colored::Colorize;
use unicode_width::UnicodeWidthStr;

use crate::sync::verify::SyncSummaryEntry;

const NAME_WIDTH: usize = 20;
const COUNT_WIDTH: usize = 12;
const TOTAL_WIDTH: usize = NAME_WIDTH + COUNT_WIDTH * 2 + 12;

/// Pad to a display width, accounting for non-ASCII glyphs.
fn pad(s: &str, width: usize) -> String {
    let current = UnicodeWidthStr::width(s);
    if current >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - current))
    }
}

fn count_cell(count: Option<i64>) -> String {
    match count {
        Some(n) => n.to_string(),
        None => "Error".to_string(),
    }
}

/// Plain-text report body (uncolored, used by tests).
pub fn render(entries: &[SyncSummaryEntry]) -> String {
    let mut out = String::new();
    out.push_str(&"═".repeat(TOTAL_WIDTH));
    out.push('\n');
    out.push_str(&format!(
        "{}{}{}{}\n",
        pad("Table Name", NAME_WIDTH),
        pad("Production", COUNT_WIDTH),
        pad("Local", COUNT_WIDTH),
        "Status"
    ));
    out.push_str(&"─".repeat(TOTAL_WIDTH));
    out.push('\n');

    for entry in entries {
        let status = if entry.synced { "✓ Synced" } else { "✗ Mismatch" };
        out.push_str(&format!(
            "{}{}{}{}\n",
            pad(&entry.table, NAME_WIDTH),
            pad(&count_cell(entry.production_count), COUNT_WIDTH),
            pad(&count_cell(entry.local_count), COUNT_WIDTH),
            status
        ));
    }

    out.push_str(&"═".repeat(TOTAL_WIDTH));
    out.push('\n');
    out
}

/// Print the report with a colored status column.
pub fn print(entries: &[SyncSummaryEntry]) {
    println!("{}", "═".repeat(TOTAL_WIDTH));
    println!(
        "{}{}{}{}",
        pad("Table Name", NAME_WIDTH),
        pad("Production", COUNT_WIDTH),
        pad("Local", COUNT_WIDTH),
        "Status"
    );
    println!("{}", "─".repeat(TOTAL_WIDTH));

    for entry in entries {
        let status = if entry.synced {
            "✓ Synced".green()
        } else {
            "✗ Mismatch".red()
        };
        println!(
            "{}{}{}{}",
            pad(&entry.table, NAME_WIDTH),
            pad(&count_cell(entry.production_count), COUNT_WIDTH),
            pad(&count_cell(entry.local_count), COUNT_WIDTH),
            status
        );
    }

    println!("{}", "═".repeat(TOTAL_WIDTH));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_pads_columns() {
        let entries = vec![SyncSummaryEntry::new("course", Some(120), Some(120))];
        let report = render(&entries);
        let row = report.lines().nth(3).unwrap();

        assert!(row.starts_with("course"));
        assert_eq!(&row[..NAME_WIDTH], "course              ");
        assert!(row.ends_with("✓ Synced"));
    }

    #[test]
    fn test_render_marks_mismatch() {
        let entries = vec![SyncSummaryEntry::new("slot", Some(10), Some(7))];
        let report = render(&entries);
        assert!(report.contains("✗ Mismatch"));
    }

    #[test]
    fn test_render_shows_error_placeholder() {
        let entries = vec![SyncSummaryEntry::new("attendance", None, Some(3))];
        let report = render(&entries);
        assert!(report.contains("Error"));
        assert!(report.contains("✗ Mismatch"));
    }

    #[test]
    fn test_render_borders() {
        let report = render(&[]);
        let lines: Vec<&str> = report.lines().collect();
        assert!(lines[0].chars().all(|c| c == '═'));
        assert!(lines[2].chars().all(|c| c == '─'));
        assert!(lines.last().unwrap().chars().all(|c| c == '═'));
    }

    #[test]
    fn test_pad_leaves_long_values_alone() {
        assert_eq!(pad("course_registration_x", 20), "course_registration_x");
    }
}
