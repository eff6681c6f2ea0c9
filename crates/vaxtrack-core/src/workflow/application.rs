//! Application recording with optional automatic follow-up scheduling.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use super::{field_value, MissingField, WorkflowError, WorkflowResult};
use crate::db::Database;
use crate::models::{Application, Appointment};
use crate::rules::{select_follow_up_batch, validate_next_dose_date};

/// Form input for recording a vaccination.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplicationRequest {
    pub client_id: Option<String>,
    pub vaccine_id: Option<String>,
    pub batch_id: Option<String>,
    pub employee_id: Option<String>,
    /// Dose number within the course; forms default it to 1
    pub dose_number: u32,
    /// When set, a follow-up appointment is attempted after recording
    pub next_dose_date: Option<NaiveDate>,
    pub adverse_reactions: Option<String>,
    pub notes: Option<String>,
}

/// Outcome of the follow-up scheduling step. Failures here never undo
/// the committed application; they surface as warnings.
#[derive(Debug, Clone, PartialEq)]
pub enum FollowUp {
    /// No next-dose date was supplied
    NotRequested,
    /// A follow-up appointment was created
    Scheduled(Appointment),
    /// No batch of the vaccine can cover the proposed date
    NoEligibleBatch { proposed_date: NaiveDate },
    /// The appointment write itself failed after the application stood
    Failed { reason: String },
}

/// Result of [`record_application`].
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationOutcome {
    pub application: Application,
    pub follow_up: FollowUp,
}

/// Record a vaccination.
///
/// Steps: validate required fields (all missing ones reported
/// together), gate the next-dose date on the interval rule, snapshot
/// batch prices, insert the application (the stock decrement is the
/// schema trigger's job), then attempt the follow-up appointment if a
/// next-dose date was given. Steps before the insert abort with no
/// side effects; the follow-up step only ever downgrades to a warning.
pub fn record_application(
    db: &Database,
    now: NaiveDateTime,
    request: &ApplicationRequest,
) -> WorkflowResult<ApplicationOutcome> {
    let today = now.date();

    let mut missing = Vec::new();
    if field_value(&request.client_id).is_none() {
        missing.push(MissingField::Client);
    }
    if field_value(&request.vaccine_id).is_none() {
        missing.push(MissingField::Vaccine);
    }
    if field_value(&request.batch_id).is_none() {
        missing.push(MissingField::Batch);
    }
    if field_value(&request.employee_id).is_none() {
        missing.push(MissingField::Employee);
    }
    if !missing.is_empty() {
        return Err(WorkflowError::MissingFields(missing));
    }

    // All four verified non-empty above
    let client_id = field_value(&request.client_id).unwrap_or_default().to_string();
    let vaccine_id = field_value(&request.vaccine_id).unwrap_or_default().to_string();
    let batch_id = field_value(&request.batch_id).unwrap_or_default().to_string();
    let employee_id = field_value(&request.employee_id).unwrap_or_default().to_string();

    let client = db
        .get_client(&client_id)?
        .ok_or_else(|| WorkflowError::NotFound(format!("client {}", client_id)))?;
    let vaccine = db
        .get_vaccine(&vaccine_id)?
        .ok_or_else(|| WorkflowError::NotFound(format!("vaccine {}", vaccine_id)))?;
    let batch = db
        .get_batch(&batch_id)?
        .ok_or_else(|| WorkflowError::NotFound(format!("batch {}", batch_id)))?;
    db.get_employee(&employee_id)?
        .ok_or_else(|| WorkflowError::NotFound(format!("employee {}", employee_id)))?;

    if batch.vaccine_id != vaccine.id {
        return Err(WorkflowError::BatchVaccineMismatch(batch.id));
    }

    if let Some(proposed) = request.next_dose_date {
        validate_next_dose_date(&vaccine, today, proposed)?;
    }

    let mut application = Application::for_batch(
        client.national_id.clone(),
        employee_id,
        &batch,
        None,
        now,
        request.dose_number,
    );
    application.adverse_reactions = request.adverse_reactions.clone();
    application.notes = request.notes.clone();

    db.insert_application(&application)?;
    tracing::info!(
        application = %application.id,
        client = %client.national_id,
        batch = %batch.id,
        dose = application.dose_number,
        "application recorded"
    );

    let follow_up = match request.next_dose_date {
        None => FollowUp::NotRequested,
        Some(proposed) => schedule_follow_up(db, &client.national_id, &vaccine.id, proposed),
    };

    Ok(ApplicationOutcome {
        application,
        follow_up,
    })
}

/// Attempt the follow-up appointment. Never fails the overall
/// operation: the application is already committed.
fn schedule_follow_up(
    db: &Database,
    client_id: &str,
    vaccine_id: &str,
    proposed_date: NaiveDate,
) -> FollowUp {
    let batches = match db.list_batches_for_vaccine(vaccine_id) {
        Ok(batches) => batches,
        Err(e) => {
            tracing::warn!(vaccine = %vaccine_id, error = %e, "follow-up scheduling failed");
            return FollowUp::Failed {
                reason: e.to_string(),
            };
        }
    };

    let Some(batch) = select_follow_up_batch(&batches, proposed_date) else {
        tracing::warn!(
            vaccine = %vaccine_id,
            proposed = %proposed_date,
            "no eligible batch for follow-up"
        );
        return FollowUp::NoEligibleBatch { proposed_date };
    };

    let appointment = Appointment::new(
        client_id.to_string(),
        batch.id.clone(),
        proposed_date.and_time(NaiveTime::MIN),
    );

    match db.insert_appointment(&appointment) {
        Ok(()) => {
            tracing::info!(appointment = %appointment.id, batch = %batch.id, "follow-up scheduled");
            FollowUp::Scheduled(appointment)
        }
        Err(e) => {
            tracing::warn!(error = %e, "follow-up appointment write failed");
            FollowUp::Failed {
                reason: e.to_string(),
            }
        }
    }
}
