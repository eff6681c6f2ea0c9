//! Vaxtrack reporting.
//!
//! Builds the dashboard view models the reporting pages render, through
//! the core database's raw-connection seam:
//!
//! - [`dashboard`]: operational summary (counts, low stock, expiries)
//! - [`revenue`]: monthly revenue/cost from historical price snapshots
//! - [`coverage`]: per-vaccine doses administered vs. scheduled
//!
//! Every report re-reads the full tables on build; there is no caching
//! layer to invalidate.

pub mod coverage;
pub mod dashboard;
pub mod revenue;

pub use coverage::{CoverageReport, CoverageReporter, CoverageRow};
pub use dashboard::{DashboardReporter, DashboardSummary, ExpiryAlert, StockAlert};
pub use revenue::{RevenueReport, RevenueReporter, RevenueRow};

use thiserror::Error;

/// Reporting errors.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Database error: {0}")]
    Db(#[from] vaxtrack_core::db::DbError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ReportResult<T> = Result<T, ReportError>;

/// Escape a string for CSV output.
pub(crate) fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_escaping() {
        assert_eq!(escape_csv("simple"), "simple");
        assert_eq!(escape_csv("with,comma"), "\"with,comma\"");
        assert_eq!(escape_csv("with\"quote"), "\"with\"\"quote\"");
        assert_eq!(escape_csv("with\nnewline"), "\"with\nnewline\"");
    }
}
