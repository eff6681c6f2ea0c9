//! Appointment confirmation.

use chrono::NaiveDateTime;

use super::{field_value, MissingField, WorkflowError, WorkflowResult};
use crate::db::Database;
use crate::models::Application;

/// Form input for confirming a scheduled appointment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfirmationRequest {
    pub appointment_id: String,
    /// The confirming employee; required
    pub employee_id: Option<String>,
    pub adverse_reactions: Option<String>,
    pub notes: Option<String>,
}

/// Confirm a scheduled appointment by recording an application against
/// it.
///
/// The appointment's transition to completed (and the stock decrement)
/// is performed by schema triggers on the application insert; this
/// workflow does not verify either. The dose number is derived from the
/// client's prior applications of the batch's vaccine.
pub fn confirm_appointment(
    db: &Database,
    now: NaiveDateTime,
    request: &ConfirmationRequest,
) -> WorkflowResult<Application> {
    let Some(employee_id) = field_value(&request.employee_id) else {
        return Err(WorkflowError::MissingFields(vec![MissingField::Employee]));
    };

    let appointment = db
        .get_appointment(&request.appointment_id)?
        .ok_or_else(|| {
            WorkflowError::NotFound(format!("appointment {}", request.appointment_id))
        })?;

    if !appointment.is_scheduled() {
        return Err(WorkflowError::AlreadyCompleted(appointment.id));
    }

    db.get_employee(employee_id)?
        .ok_or_else(|| WorkflowError::NotFound(format!("employee {}", employee_id)))?;

    let batch = db.get_batch(&appointment.batch_id)?.ok_or_else(|| {
        WorkflowError::NotFound(format!("batch {}", appointment.batch_id))
    })?;

    let prior_doses = db
        .count_applications_for_client_and_vaccine(&appointment.client_id, &batch.vaccine_id)?;

    let mut application = Application::for_batch(
        appointment.client_id.clone(),
        employee_id.to_string(),
        &batch,
        Some(appointment.id.clone()),
        now,
        prior_doses + 1,
    );
    application.adverse_reactions = request.adverse_reactions.clone();
    application.notes = request.notes.clone();

    db.insert_application(&application)?;
    tracing::info!(
        appointment = %appointment.id,
        application = %application.id,
        dose = application.dose_number,
        "appointment confirmed"
    );

    Ok(application)
}
