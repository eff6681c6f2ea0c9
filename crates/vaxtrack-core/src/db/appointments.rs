//! Appointment database operations.

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension};

use super::{parse_datetime, Database, DbError, DbResult, DATETIME_FMT, DATE_FMT};
use crate::models::{Appointment, AppointmentStatus};

impl Database {
    /// Insert a new appointment.
    pub fn insert_appointment(&self, appointment: &Appointment) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO appointments (
                id, client_id, batch_id, employee_id, scheduled_at, status,
                notes, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                appointment.id,
                appointment.client_id,
                appointment.batch_id,
                appointment.employee_id,
                appointment.scheduled_at.format(DATETIME_FMT).to_string(),
                status_to_string(&appointment.status),
                appointment.notes,
                appointment.created_at,
                appointment.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Get an appointment by ID.
    pub fn get_appointment(&self, id: &str) -> DbResult<Option<Appointment>> {
        self.conn
            .query_row(
                r#"
                SELECT id, client_id, batch_id, employee_id, scheduled_at, status,
                       notes, created_at, updated_at
                FROM appointments
                WHERE id = ?
                "#,
                [id],
                map_appointment_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// List appointments with the given status, earliest first.
    pub fn list_appointments_by_status(
        &self,
        status: &AppointmentStatus,
    ) -> DbResult<Vec<Appointment>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, client_id, batch_id, employee_id, scheduled_at, status,
                   notes, created_at, updated_at
            FROM appointments
            WHERE status = ?
            ORDER BY scheduled_at
            "#,
        )?;

        let rows = stmt.query_map([status_to_string(status)], map_appointment_row)?;
        let mut appointments = Vec::new();
        for row in rows {
            appointments.push(row?.try_into()?);
        }
        Ok(appointments)
    }

    /// List all appointments of a client, most recent first.
    pub fn list_appointments_for_client(&self, client_id: &str) -> DbResult<Vec<Appointment>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, client_id, batch_id, employee_id, scheduled_at, status,
                   notes, created_at, updated_at
            FROM appointments
            WHERE client_id = ?
            ORDER BY scheduled_at DESC
            "#,
        )?;

        let rows = stmt.query_map([client_id], map_appointment_row)?;
        let mut appointments = Vec::new();
        for row in rows {
            appointments.push(row?.try_into()?);
        }
        Ok(appointments)
    }

    /// List appointments falling on the given clinic-local day.
    pub fn list_appointments_for_day(&self, day: NaiveDate) -> DbResult<Vec<Appointment>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, client_id, batch_id, employee_id, scheduled_at, status,
                   notes, created_at, updated_at
            FROM appointments
            WHERE date(scheduled_at) = ?
            ORDER BY scheduled_at
            "#,
        )?;

        let rows = stmt.query_map([day.format(DATE_FMT).to_string()], map_appointment_row)?;
        let mut appointments = Vec::new();
        for row in rows {
            appointments.push(row?.try_into()?);
        }
        Ok(appointments)
    }

    /// Delete an appointment (cancellation of a booking).
    pub fn delete_appointment(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM appointments WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }
}

/// Intermediate row struct for database mapping.
struct AppointmentRow {
    id: String,
    client_id: String,
    batch_id: String,
    employee_id: Option<String>,
    scheduled_at: String,
    status: String,
    notes: Option<String>,
    created_at: String,
    updated_at: String,
}

fn map_appointment_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<AppointmentRow> {
    Ok(AppointmentRow {
        id: row.get(0)?,
        client_id: row.get(1)?,
        batch_id: row.get(2)?,
        employee_id: row.get(3)?,
        scheduled_at: row.get(4)?,
        status: row.get(5)?,
        notes: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

impl TryFrom<AppointmentRow> for Appointment {
    type Error = DbError;

    fn try_from(row: AppointmentRow) -> Result<Self, Self::Error> {
        Ok(Appointment {
            scheduled_at: parse_datetime(&row.scheduled_at, "appointments.scheduled_at")?,
            status: string_to_status(&row.status)?,
            id: row.id,
            client_id: row.client_id,
            batch_id: row.batch_id,
            employee_id: row.employee_id,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn status_to_string(status: &AppointmentStatus) -> &'static str {
    match status {
        AppointmentStatus::Scheduled => "scheduled",
        AppointmentStatus::Completed => "completed",
    }
}

fn string_to_status(s: &str) -> Result<AppointmentStatus, DbError> {
    match s {
        "scheduled" => Ok(AppointmentStatus::Scheduled),
        "completed" => Ok(AppointmentStatus::Completed),
        _ => Err(DbError::Constraint(format!(
            "Unknown appointment status: {}",
            s
        ))),
    }
}
