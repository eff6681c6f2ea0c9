//! Application (vaccination event) database operations.

use rusqlite::{params, OptionalExtension};

use super::{parse_datetime, Database, DbError, DbResult, DATETIME_FMT};
use crate::models::Application;

impl Database {
    /// Insert a new application.
    ///
    /// Schema triggers decrement the batch stock and, when the row
    /// references an appointment, mark that appointment completed. The
    /// caller is expected to trust both (no read-back verification).
    pub fn insert_application(&self, application: &Application) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO applications (
                id, client_id, employee_id, appointment_id, batch_id, applied_at,
                dose_number, adverse_reactions, notes, unit_purchase_price,
                unit_sale_price, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
            params![
                application.id,
                application.client_id,
                application.employee_id,
                application.appointment_id,
                application.batch_id,
                application.applied_at.format(DATETIME_FMT).to_string(),
                application.dose_number,
                application.adverse_reactions,
                application.notes,
                application.unit_purchase_price,
                application.unit_sale_price,
                application.created_at,
            ],
        )?;
        Ok(())
    }

    /// Get an application by ID.
    pub fn get_application(&self, id: &str) -> DbResult<Option<Application>> {
        self.conn
            .query_row(
                r#"
                SELECT id, client_id, employee_id, appointment_id, batch_id, applied_at,
                       dose_number, adverse_reactions, notes, unit_purchase_price,
                       unit_sale_price, created_at
                FROM applications
                WHERE id = ?
                "#,
                [id],
                map_application_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// List all applications of a client, most recent first.
    pub fn list_applications_for_client(&self, client_id: &str) -> DbResult<Vec<Application>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, client_id, employee_id, appointment_id, batch_id, applied_at,
                   dose_number, adverse_reactions, notes, unit_purchase_price,
                   unit_sale_price, created_at
            FROM applications
            WHERE client_id = ?
            ORDER BY applied_at DESC
            "#,
        )?;

        let rows = stmt.query_map([client_id], map_application_row)?;
        let mut applications = Vec::new();
        for row in rows {
            applications.push(row?.try_into()?);
        }
        Ok(applications)
    }

    /// Count how many doses of a vaccine a client has already received.
    pub fn count_applications_for_client_and_vaccine(
        &self,
        client_id: &str,
        vaccine_id: &str,
    ) -> DbResult<u32> {
        let count: u32 = self.conn.query_row(
            r#"
            SELECT COUNT(*)
            FROM applications a
            JOIN batches b ON b.id = a.batch_id
            WHERE a.client_id = ?1 AND b.vaccine_id = ?2
            "#,
            params![client_id, vaccine_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

/// Intermediate row struct for database mapping.
struct ApplicationRow {
    id: String,
    client_id: String,
    employee_id: String,
    appointment_id: Option<String>,
    batch_id: String,
    applied_at: String,
    dose_number: u32,
    adverse_reactions: Option<String>,
    notes: Option<String>,
    unit_purchase_price: f64,
    unit_sale_price: f64,
    created_at: String,
}

fn map_application_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ApplicationRow> {
    Ok(ApplicationRow {
        id: row.get(0)?,
        client_id: row.get(1)?,
        employee_id: row.get(2)?,
        appointment_id: row.get(3)?,
        batch_id: row.get(4)?,
        applied_at: row.get(5)?,
        dose_number: row.get(6)?,
        adverse_reactions: row.get(7)?,
        notes: row.get(8)?,
        unit_purchase_price: row.get(9)?,
        unit_sale_price: row.get(10)?,
        created_at: row.get(11)?,
    })
}

impl TryFrom<ApplicationRow> for Application {
    type Error = DbError;

    fn try_from(row: ApplicationRow) -> Result<Self, Self::Error> {
        Ok(Application {
            applied_at: parse_datetime(&row.applied_at, "applications.applied_at")?,
            id: row.id,
            client_id: row.client_id,
            employee_id: row.employee_id,
            appointment_id: row.appointment_id,
            batch_id: row.batch_id,
            dose_number: row.dose_number,
            adverse_reactions: row.adverse_reactions,
            notes: row.notes,
            unit_purchase_price: row.unit_purchase_price,
            unit_sale_price: row.unit_sale_price,
            created_at: row.created_at,
        })
    }
}
