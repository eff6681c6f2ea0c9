//! Operational dashboard summary.

use chrono::{Duration, NaiveDate};
use rusqlite::params;
use serde::{Deserialize, Serialize};

use vaxtrack_core::db::Database;

use crate::ReportResult;

/// Batches at or below this remaining count raise a stock alert.
const LOW_STOCK_THRESHOLD: u32 = 5;

/// Batches expiring within this many days raise an expiry alert.
const EXPIRY_WINDOW_DAYS: i64 = 30;

/// A batch running low on doses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StockAlert {
    pub batch_id: String,
    pub vaccine_name: String,
    pub batch_code: String,
    pub remaining_quantity: u32,
}

/// A batch expiring soon with stock still on the shelf.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpiryAlert {
    pub batch_id: String,
    pub vaccine_name: String,
    pub batch_code: String,
    pub expiration_date: String,
    pub remaining_quantity: u32,
}

/// The dashboard page's numbers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardSummary {
    /// When the summary was built
    pub generated_at: String,
    /// Reference day the counts are relative to
    pub reference_date: String,
    pub total_clients: u32,
    pub active_clients: u32,
    pub scheduled_appointments_today: u32,
    pub applications_this_month: u32,
    pub low_stock: Vec<StockAlert>,
    pub expiring_soon: Vec<ExpiryAlert>,
}

impl DashboardSummary {
    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Dashboard reporter.
pub struct DashboardReporter<'a> {
    db: &'a Database,
}

impl<'a> DashboardReporter<'a> {
    /// Create a new dashboard reporter.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Build the summary for the given clinic-local day.
    pub fn summarize(&self, today: NaiveDate) -> ReportResult<DashboardSummary> {
        let conn = self.db.conn();
        let day = today.format("%Y-%m-%d").to_string();
        let month = today.format("%Y-%m").to_string();

        let total_clients: u32 =
            conn.query_row("SELECT COUNT(*) FROM clients", [], |row| row.get(0))?;
        let active_clients: u32 = conn.query_row(
            "SELECT COUNT(*) FROM clients WHERE active = 1",
            [],
            |row| row.get(0),
        )?;

        let scheduled_appointments_today: u32 = conn.query_row(
            "SELECT COUNT(*) FROM appointments WHERE status = 'scheduled' AND date(scheduled_at) = ?",
            [&day],
            |row| row.get(0),
        )?;

        let applications_this_month: u32 = conn.query_row(
            "SELECT COUNT(*) FROM applications WHERE strftime('%Y-%m', applied_at) = ?",
            [&month],
            |row| row.get(0),
        )?;

        let low_stock = self.low_stock()?;
        let expiring_soon = self.expiring_soon(today)?;

        Ok(DashboardSummary {
            generated_at: chrono::Utc::now().to_rfc3339(),
            reference_date: day,
            total_clients,
            active_clients,
            scheduled_appointments_today,
            applications_this_month,
            low_stock,
            expiring_soon,
        })
    }

    fn low_stock(&self) -> ReportResult<Vec<StockAlert>> {
        let mut stmt = self.db.conn().prepare(
            r#"
            SELECT b.id, v.name, b.code, b.remaining_quantity
            FROM batches b
            JOIN vaccines v ON v.id = b.vaccine_id
            WHERE b.remaining_quantity <= ?
            ORDER BY b.remaining_quantity, v.name
            "#,
        )?;

        let rows = stmt.query_map([LOW_STOCK_THRESHOLD], |row| {
            Ok(StockAlert {
                batch_id: row.get(0)?,
                vaccine_name: row.get(1)?,
                batch_code: row.get(2)?,
                remaining_quantity: row.get(3)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    fn expiring_soon(&self, today: NaiveDate) -> ReportResult<Vec<ExpiryAlert>> {
        let window_end = today + Duration::days(EXPIRY_WINDOW_DAYS);
        let mut stmt = self.db.conn().prepare(
            r#"
            SELECT b.id, v.name, b.code, b.expiration_date, b.remaining_quantity
            FROM batches b
            JOIN vaccines v ON v.id = b.vaccine_id
            WHERE b.remaining_quantity > 0
              AND b.expiration_date >= ?1
              AND b.expiration_date <= ?2
            ORDER BY b.expiration_date, v.name
            "#,
        )?;

        let rows = stmt.query_map(
            params![
                today.format("%Y-%m-%d").to_string(),
                window_end.format("%Y-%m-%d").to_string(),
            ],
            |row| {
                Ok(ExpiryAlert {
                    batch_id: row.get(0)?,
                    vaccine_name: row.get(1)?,
                    batch_code: row.get(2)?,
                    expiration_date: row.get(3)?,
                    remaining_quantity: row.get(4)?,
                })
            },
        )?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
