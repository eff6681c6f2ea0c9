//! Appointment models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Appointment status. Transitions Scheduled -> Completed exactly once,
/// caused by an application insert referencing the appointment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AppointmentStatus {
    /// Booked, waiting for the client
    Scheduled,
    /// A vaccination was recorded against it
    Completed,
}

/// A scheduled vaccination appointment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    /// Unique appointment ID
    pub id: String,
    /// Client national ID
    pub client_id: String,
    /// Reserved batch
    pub batch_id: String,
    /// Confirming employee; unset until the appointment is completed
    pub employee_id: Option<String>,
    /// Scheduled date and time, clinic-local
    pub scheduled_at: NaiveDateTime,
    /// Status
    pub status: AppointmentStatus,
    /// Free-text notes
    pub notes: Option<String>,
    /// Creation timestamp
    pub created_at: String,
    /// Last update timestamp
    pub updated_at: String,
}

impl Appointment {
    /// Create a new scheduled appointment with no employee assigned.
    pub fn new(client_id: String, batch_id: String, scheduled_at: NaiveDateTime) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            client_id,
            batch_id,
            employee_id: None,
            scheduled_at,
            status: AppointmentStatus::Scheduled,
            notes: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Whether the appointment is still waiting for the client.
    pub fn is_scheduled(&self) -> bool {
        self.status == AppointmentStatus::Scheduled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    #[test]
    fn test_new_appointment() {
        let at = NaiveDate::from_ymd_opt(2025, 7, 1)
            .unwrap()
            .and_time(NaiveTime::MIN);
        let appointment = Appointment::new("12345678900".into(), "batch-1".into(), at);
        assert!(appointment.is_scheduled());
        assert!(appointment.employee_id.is_none());
        assert_eq!(appointment.id.len(), 36);
    }
}
