//! Monthly revenue report.
//!
//! Computed from the per-application price snapshots, so repricing a
//! batch never rewrites past months.

use serde::{Deserialize, Serialize};

use vaxtrack_core::db::Database;

use crate::{escape_csv, ReportResult};

/// One month of application revenue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RevenueRow {
    /// Month in YYYY-MM form
    pub month: String,
    pub applications: u32,
    /// Sum of snapshotted sale prices
    pub revenue: f64,
    /// Sum of snapshotted per-dose purchase costs
    pub cost: f64,
}

impl RevenueRow {
    /// Gross margin for the month.
    pub fn margin(&self) -> f64 {
        self.revenue - self.cost
    }
}

/// Revenue report across all recorded months.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RevenueReport {
    /// When the report was built
    pub generated_at: String,
    pub rows: Vec<RevenueRow>,
    pub total_revenue: f64,
    pub total_cost: f64,
}

impl RevenueReport {
    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export to CSV format.
    pub fn to_csv(&self) -> String {
        let mut csv = String::new();
        csv.push_str("month,applications,revenue,cost,margin\n");
        for row in &self.rows {
            csv.push_str(&format!(
                "{},{},{:.2},{:.2},{:.2}\n",
                escape_csv(&row.month),
                row.applications,
                row.revenue,
                row.cost,
                row.margin(),
            ));
        }
        csv
    }
}

/// Revenue reporter.
pub struct RevenueReporter<'a> {
    db: &'a Database,
}

impl<'a> RevenueReporter<'a> {
    /// Create a new revenue reporter.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Build the report over every recorded application, oldest month
    /// first.
    pub fn report(&self) -> ReportResult<RevenueReport> {
        let mut stmt = self.db.conn().prepare(
            r#"
            SELECT strftime('%Y-%m', applied_at) AS month,
                   COUNT(*),
                   SUM(unit_sale_price),
                   SUM(unit_purchase_price)
            FROM applications
            GROUP BY month
            ORDER BY month
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(RevenueRow {
                month: row.get(0)?,
                applications: row.get(1)?,
                revenue: row.get(2)?,
                cost: row.get(3)?,
            })
        })?;

        let rows: Vec<RevenueRow> = rows.collect::<Result<Vec<_>, _>>()?;
        let total_revenue = rows.iter().map(|r| r.revenue).sum();
        let total_cost = rows.iter().map(|r| r.cost).sum();

        Ok(RevenueReport {
            generated_at: chrono::Utc::now().to_rfc3339(),
            rows,
            total_revenue,
            total_cost,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use vaxtrack_core::models::{Application, Batch, Client, Employee, NewEmployee, Vaccine};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn setup_db_with_applications() -> Database {
        let db = Database::open_in_memory().unwrap();

        let client = Client::new("1".into(), "Ana".into(), date(1990, 4, 12));
        db.insert_client(&client).unwrap();

        let employee = Employee::from_new(
            NewEmployee {
                name: "Dr. Lima".into(),
                national_id: "n1".into(),
                email: "lima@clinic.test".into(),
                password: "pw".into(),
            },
            4,
        )
        .unwrap();
        db.insert_employee(&employee).unwrap();

        let vaccine = Vaccine::new("Tetravalent".into(), "BioPharm".into(), 2, 21);
        db.insert_vaccine(&vaccine).unwrap();

        // 10 doses at 100.0 purchase => 10.0 per dose; sold at 30.0
        let batch = Batch::new(vaccine.id.clone(), "L001".into(), 10, date(2026, 12, 31), 100.0, 30.0);
        db.insert_batch(&batch).unwrap();

        for (month, day) in [(6, 10), (6, 20), (7, 1)] {
            let application = Application::for_batch(
                client.national_id.clone(),
                employee.id.clone(),
                &batch,
                None,
                date(2025, month, day).and_time(NaiveTime::from_hms_opt(9, 0, 0).unwrap()),
                1,
            );
            db.insert_application(&application).unwrap();
        }

        db
    }

    #[test]
    fn test_monthly_grouping() {
        let db = setup_db_with_applications();

        let report = RevenueReporter::new(&db).report().unwrap();
        assert_eq!(report.rows.len(), 2);

        let june = &report.rows[0];
        assert_eq!(june.month, "2025-06");
        assert_eq!(june.applications, 2);
        assert!((june.revenue - 60.0).abs() < 1e-9);
        assert!((june.cost - 20.0).abs() < 1e-9);
        assert!((june.margin() - 40.0).abs() < 1e-9);

        let july = &report.rows[1];
        assert_eq!(july.month, "2025-07");
        assert_eq!(july.applications, 1);
    }

    #[test]
    fn test_totals() {
        let db = setup_db_with_applications();

        let report = RevenueReporter::new(&db).report().unwrap();
        assert!((report.total_revenue - 90.0).abs() < 1e-9);
        assert!((report.total_cost - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_snapshots_shield_history_from_repricing() {
        let db = setup_db_with_applications();

        let before = RevenueReporter::new(&db).report().unwrap();

        // Reprice the batch after the fact
        db.conn()
            .execute("UPDATE batches SET sale_price = 999.0, purchase_price = 999.0", [])
            .unwrap();

        let after = RevenueReporter::new(&db).report().unwrap();
        assert_eq!(before.rows, after.rows);
    }

    #[test]
    fn test_csv_export() {
        let db = setup_db_with_applications();

        let report = RevenueReporter::new(&db).report().unwrap();
        let csv = report.to_csv();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3); // Header + 2 months
        assert!(lines[0].starts_with("month,"));
        assert!(lines[1].starts_with("2025-06,2,60.00,20.00,40.00"));
    }

    #[test]
    fn test_empty_database() {
        let db = Database::open_in_memory().unwrap();

        let report = RevenueReporter::new(&db).report().unwrap();
        assert!(report.rows.is_empty());
        assert_eq!(report.total_revenue, 0.0);
        assert_eq!(report.to_csv().lines().count(), 1);
    }
}
