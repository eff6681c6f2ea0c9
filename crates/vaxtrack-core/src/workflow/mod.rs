//! Vaccination workflows.
//!
//! These coordinate the rules in [`crate::rules`] with the database:
//! recording an application (with optional automatic follow-up
//! scheduling) and confirming an appointment.

mod application;
mod confirmation;

pub use application::*;
pub use confirmation::*;

use thiserror::Error;

use crate::db::DbError;
use crate::rules::DoseIntervalError;

/// A required form field left empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingField {
    Client,
    Vaccine,
    Batch,
    Employee,
}

impl MissingField {
    /// User-facing label.
    pub fn label(&self) -> &'static str {
        match self {
            MissingField::Client => "client",
            MissingField::Vaccine => "vaccine",
            MissingField::Batch => "batch",
            MissingField::Employee => "employee",
        }
    }
}

fn missing_labels(fields: &[MissingField]) -> String {
    fields
        .iter()
        .map(|f| f.label())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Workflow errors. Everything here is raised before the application
/// row is written; follow-up scheduling failures are not errors but a
/// warning outcome (see [`FollowUp`]).
#[derive(Error, Debug)]
pub enum WorkflowError {
    /// All empty required fields, reported together.
    #[error("missing required fields: {}", missing_labels(.0))]
    MissingFields(Vec<MissingField>),

    #[error(transparent)]
    DoseInterval(#[from] DoseIntervalError),

    #[error("record not found: {0}")]
    NotFound(String),

    #[error("batch {0} does not belong to the selected vaccine")]
    BatchVaccineMismatch(String),

    #[error("appointment already completed: {0}")]
    AlreadyCompleted(String),

    #[error("database error: {0}")]
    Db(#[from] DbError),
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;

/// Treat `None` and whitespace-only strings the same way a form treats
/// an untouched select box.
pub(crate) fn field_value<'a>(value: &'a Option<String>) -> Option<&'a str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
