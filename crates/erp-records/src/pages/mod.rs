//! Page definitions for the shipped record types

pub mod approvals;
pub mod assets;
pub mod backups;
pub mod invoices;
pub mod notices;

/// Resource names with a page definition
pub const RESOURCES: &[&str] = &["invoices", "assets", "notices", "backups", "approvals"];

/// Year and month (`YYYY-MM`) of a date string, used as a chart category
pub(crate) fn month_of(date: &str) -> String {
    date.chars().take(7).collect()
}
