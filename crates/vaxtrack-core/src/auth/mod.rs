//! Employee authentication and session lifecycle.
//!
//! Denials are uniform: the caller never learns whether the email was
//! unknown, the employee inactive, or the password wrong. The reason is
//! logged internally only.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ClinicConfig;
use crate::db::{Database, DbError};
use crate::models::{Employee, EmployeeRole, NewEmployee};

/// Fixed key the single session object is stored under.
pub const SESSION_KEY: &str = "vaxtrack.session";

/// Authentication errors. Denied credentials are not an error; they are
/// the `Ok(None)` outcome of [`authenticate`].
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Database error: {0}")]
    Db(#[from] DbError),

    #[error("Password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
}

pub type AuthResult<T> = Result<T, AuthError>;

/// An authenticated session with explicit expiry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    /// Authenticated employee ID
    pub employee_id: String,
    /// Display name
    pub employee_name: String,
    /// Role granted to this session
    pub role: EmployeeRole,
    /// When the session was opened, clinic-local
    pub issued_at: NaiveDateTime,
    /// When the session stops being valid
    pub expires_at: NaiveDateTime,
}

impl Session {
    /// Open a session for an employee, valid for `ttl_minutes`.
    pub fn open(employee: &Employee, now: NaiveDateTime, ttl_minutes: u32) -> Self {
        Self {
            employee_id: employee.id.clone(),
            employee_name: employee.name.clone(),
            role: employee.role,
            issued_at: now,
            expires_at: now + Duration::minutes(i64::from(ttl_minutes)),
        }
    }

    /// Whether the session has expired at the given instant.
    pub fn is_expired(&self, now: NaiveDateTime) -> bool {
        now >= self.expires_at
    }
}

/// Register a new employee, hashing the password at the configured cost.
pub fn register_employee(
    db: &Database,
    config: &ClinicConfig,
    new: NewEmployee,
) -> AuthResult<Employee> {
    let employee = Employee::from_new(new, config.bcrypt_cost)?;
    db.insert_employee(&employee)?;
    tracing::info!(employee = %employee.id, "employee registered");
    Ok(employee)
}

/// Verify a credential pair against the employee registry.
///
/// On success the session is persisted and returned; on any denial the
/// stored session is cleared and `Ok(None)` comes back.
pub fn authenticate(
    db: &Database,
    config: &ClinicConfig,
    now: NaiveDateTime,
    email: &str,
    password: &str,
) -> AuthResult<Option<Session>> {
    let Some(employee) = db.get_employee_by_email(email)? else {
        tracing::warn!(email, "authentication denied: unknown email");
        db.clear_session()?;
        return Ok(None);
    };

    if !employee.active {
        tracing::warn!(employee = %employee.id, "authentication denied: inactive");
        db.clear_session()?;
        return Ok(None);
    }

    match employee.verify_password(password) {
        Ok(true) => {}
        Ok(false) => {
            tracing::warn!(employee = %employee.id, "authentication denied: bad password");
            db.clear_session()?;
            return Ok(None);
        }
        Err(e) => {
            // A malformed stored hash denies like a bad password
            tracing::warn!(employee = %employee.id, error = %e, "authentication denied: unverifiable hash");
            db.clear_session()?;
            return Ok(None);
        }
    }

    let session = Session::open(&employee, now, config.session_ttl_minutes);
    db.save_session(&session)?;
    tracing::info!(employee = %employee.id, "session opened");
    Ok(Some(session))
}

/// Return the stored session if present and unexpired. An expired
/// session is invalidated on read.
pub fn current_session(db: &Database, now: NaiveDateTime) -> AuthResult<Option<Session>> {
    match db.load_session()? {
        Some(session) if session.is_expired(now) => {
            tracing::info!(employee = %session.employee_id, "session expired");
            db.clear_session()?;
            Ok(None)
        }
        other => Ok(other),
    }
}

/// Explicitly end the current session.
pub fn logout(db: &Database) -> AuthResult<()> {
    db.clear_session()?;
    Ok(())
}
