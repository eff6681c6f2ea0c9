//! Per-vaccine coverage report.

use serde::{Deserialize, Serialize};

use vaxtrack_core::db::Database;

use crate::{escape_csv, ReportResult};

/// Coverage numbers for one vaccine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoverageRow {
    pub vaccine_id: String,
    pub vaccine_name: String,
    /// Doses actually recorded
    pub doses_administered: u32,
    /// Bookings still waiting for the client
    pub appointments_scheduled: u32,
    /// Doses still on the shelf across all batches
    pub doses_in_stock: u32,
}

/// Coverage report across the whole catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoverageReport {
    /// When the report was built
    pub generated_at: String,
    pub rows: Vec<CoverageRow>,
}

impl CoverageReport {
    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export to CSV format.
    pub fn to_csv(&self) -> String {
        let mut csv = String::new();
        csv.push_str("vaccine_id,vaccine_name,doses_administered,appointments_scheduled,doses_in_stock\n");
        for row in &self.rows {
            csv.push_str(&format!(
                "{},{},{},{},{}\n",
                escape_csv(&row.vaccine_id),
                escape_csv(&row.vaccine_name),
                row.doses_administered,
                row.appointments_scheduled,
                row.doses_in_stock,
            ));
        }
        csv
    }
}

/// Coverage reporter.
pub struct CoverageReporter<'a> {
    db: &'a Database,
}

impl<'a> CoverageReporter<'a> {
    /// Create a new coverage reporter.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Build the report over every vaccine in the catalog.
    pub fn report(&self) -> ReportResult<CoverageReport> {
        let mut stmt = self.db.conn().prepare(
            r#"
            SELECT v.id,
                   v.name,
                   (SELECT COUNT(*)
                      FROM applications a
                      JOIN batches b ON b.id = a.batch_id
                     WHERE b.vaccine_id = v.id),
                   (SELECT COUNT(*)
                      FROM appointments ap
                      JOIN batches b ON b.id = ap.batch_id
                     WHERE b.vaccine_id = v.id AND ap.status = 'scheduled'),
                   (SELECT COALESCE(SUM(b.remaining_quantity), 0)
                      FROM batches b
                     WHERE b.vaccine_id = v.id)
            FROM vaccines v
            ORDER BY v.name
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(CoverageRow {
                vaccine_id: row.get(0)?,
                vaccine_name: row.get(1)?,
                doses_administered: row.get(2)?,
                appointments_scheduled: row.get(3)?,
                doses_in_stock: row.get(4)?,
            })
        })?;

        Ok(CoverageReport {
            generated_at: chrono::Utc::now().to_rfc3339(),
            rows: rows.collect::<Result<Vec<_>, _>>()?,
        })
    }
}
