//! Vaxtrack Core Library
//!
//! Clinic vaccination management: registries, batch inventory,
//! scheduling, application recording, and authentication.
//!
//! # Architecture
//!
//! ```text
//! Entity pages / modal forms (UI shell)
//!                 │
//!                 ▼
//!       ┌─────────────────────┐
//!       │    VaxtrackCore     │   exported operations per page/form
//!       └─────────┬───────────┘
//!                 │
//!      ┌──────────┼─────────────┐
//!      ▼          ▼             ▼
//!   auth      workflow        search
//!  (login)  (record/confirm) (registries)
//!      │          │
//!      │          ▼
//!      │        rules  (batch eligibility, dose intervals)
//!      │          │
//!      └────┬─────┘
//!           ▼
//!       ┌────────┐   row-level triggers own the invariants:
//!       │   db   │   stock decrement on application insert,
//!       └────────┘   appointment completion on confirmation
//! ```
//!
//! # Core Principle
//!
//! **Writes trust the schema triggers.** Recording an application never
//! verifies the stock decrement or the appointment transition; the
//! database owns those invariants, the workflows own everything that
//! must be rejected before any write.
//!
//! # Modules
//!
//! - [`db`]: SQLite database layer with FTS5 search and business triggers
//! - [`models`]: Domain types (Client, Vaccine, Batch, Appointment, etc.)
//! - [`rules`]: Batch eligibility and dose-interval validation
//! - [`workflow`]: Application recording and appointment confirmation
//! - [`auth`]: Credential check and session lifecycle
//! - [`search`]: Registry search (FTS5 + fuzzy fallback)
//! - [`config`] / [`clock`]: Clinic settings and reference timezone

pub mod auth;
pub mod clock;
pub mod config;
pub mod db;
pub mod models;
pub mod rules;
pub mod search;
pub mod workflow;

// Re-export commonly used types
pub use auth::Session;
pub use clock::ClinicClock;
pub use config::ClinicConfig;
pub use db::Database;
pub use models::{
    Application, Appointment, AppointmentStatus, Batch, Client, Employee, EmployeeRole,
    NewEmployee, Vaccine,
};
pub use rules::{
    eligible_for_application, eligible_for_scheduling, select_follow_up_batch,
    validate_next_dose_date,
};
pub use workflow::{
    ApplicationOutcome, ApplicationRequest, ConfirmationRequest, FollowUp, MissingField,
};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::sync::{Arc, Mutex};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum VaxtrackError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

impl From<db::DbError> for VaxtrackError {
    fn from(e: db::DbError) -> Self {
        VaxtrackError::DatabaseError(e.to_string())
    }
}

impl From<workflow::WorkflowError> for VaxtrackError {
    fn from(e: workflow::WorkflowError) -> Self {
        use crate::workflow::WorkflowError;
        match e {
            WorkflowError::MissingFields(_)
            | WorkflowError::DoseInterval(_)
            | WorkflowError::BatchVaccineMismatch(_)
            | WorkflowError::AlreadyCompleted(_) => VaxtrackError::ValidationError(e.to_string()),
            WorkflowError::NotFound(what) => VaxtrackError::NotFound(what),
            WorkflowError::Db(db) => VaxtrackError::DatabaseError(db.to_string()),
        }
    }
}

impl From<auth::AuthError> for VaxtrackError {
    fn from(e: auth::AuthError) -> Self {
        match e {
            auth::AuthError::Db(db) => VaxtrackError::DatabaseError(db.to_string()),
            auth::AuthError::Hash(hash) => VaxtrackError::AuthenticationError(hash.to_string()),
        }
    }
}

impl From<config::ConfigError> for VaxtrackError {
    fn from(e: config::ConfigError) -> Self {
        VaxtrackError::InvalidInput(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for VaxtrackError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        VaxtrackError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Boundary date parsing
// =========================================================================

const FFI_DATE_FMT: &str = "%Y-%m-%d";
const FFI_DATETIME_FMT: &str = "%Y-%m-%dT%H:%M:%S";

fn parse_ffi_date(value: &str, field: &str) -> Result<NaiveDate, VaxtrackError> {
    NaiveDate::parse_from_str(value.trim(), FFI_DATE_FMT).map_err(|_| {
        VaxtrackError::InvalidInput(format!("{} must be YYYY-MM-DD, got '{}'", field, value))
    })
}

/// Accept a full timestamp or a bare date (midnight, clinic-local).
fn parse_ffi_datetime(value: &str, field: &str) -> Result<NaiveDateTime, VaxtrackError> {
    let trimmed = value.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, FFI_DATETIME_FMT) {
        return Ok(dt);
    }
    parse_ffi_date(trimmed, field).map(|d| d.and_time(NaiveTime::MIN))
}

fn format_date(date: NaiveDate) -> String {
    date.format(FFI_DATE_FMT).to_string()
}

fn format_datetime(datetime: NaiveDateTime) -> String {
    datetime.format(FFI_DATETIME_FMT).to_string()
}

/// Empty and whitespace-only optional strings mean "not provided".
fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a database at the given path, with default clinic
/// settings.
#[uniffi::export]
pub fn open_database(path: String) -> Result<Arc<VaxtrackCore>, VaxtrackError> {
    let db = Database::open(&path)?;
    Ok(Arc::new(VaxtrackCore::new(db, ClinicConfig::default())))
}

/// Open or create a database, loading clinic settings from a JSON file.
#[uniffi::export]
pub fn open_database_with_config(
    db_path: String,
    config_path: String,
) -> Result<Arc<VaxtrackCore>, VaxtrackError> {
    let config = ClinicConfig::load(&config_path)?;
    let db = Database::open(&db_path)?;
    Ok(Arc::new(VaxtrackCore::new(db, config)))
}

/// Create an in-memory database (for testing).
#[uniffi::export]
pub fn open_database_in_memory() -> Result<Arc<VaxtrackCore>, VaxtrackError> {
    let db = Database::open_in_memory()?;
    Ok(Arc::new(VaxtrackCore::new(db, ClinicConfig::default())))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe core object for the UI shell.
#[derive(uniffi::Object)]
pub struct VaxtrackCore {
    db: Arc<Mutex<Database>>,
    config: ClinicConfig,
    clock: ClinicClock,
}

impl VaxtrackCore {
    fn new(db: Database, config: ClinicConfig) -> Self {
        let clock = config.clock();
        Self {
            db: Arc::new(Mutex::new(db)),
            config,
            clock,
        }
    }
}

#[uniffi::export]
impl VaxtrackCore {
    // =========================================================================
    // Authentication
    // =========================================================================

    /// Verify credentials. Denial is uniform: `None` regardless of the
    /// reason.
    pub fn login(
        &self,
        email: String,
        password: String,
    ) -> Result<Option<FfiSession>, VaxtrackError> {
        let db = self.db.lock()?;
        let session = auth::authenticate(&db, &self.config, self.clock.now(), &email, &password)?;
        Ok(session.map(|s| s.into()))
    }

    /// End the current session.
    pub fn logout(&self) -> Result<(), VaxtrackError> {
        let db = self.db.lock()?;
        auth::logout(&db)?;
        Ok(())
    }

    /// The stored session, if present and unexpired.
    pub fn current_session(&self) -> Result<Option<FfiSession>, VaxtrackError> {
        let db = self.db.lock()?;
        let session = auth::current_session(&db, self.clock.now())?;
        Ok(session.map(|s| s.into()))
    }

    /// Register a new employee.
    pub fn register_employee(
        &self,
        input: FfiNewEmployee,
    ) -> Result<FfiEmployee, VaxtrackError> {
        let db = self.db.lock()?;
        let employee = auth::register_employee(&db, &self.config, input.into())?;
        Ok(employee.into())
    }

    /// List all employees.
    pub fn list_employees(&self) -> Result<Vec<FfiEmployee>, VaxtrackError> {
        let db = self.db.lock()?;
        let employees = db.list_employees()?;
        Ok(employees.into_iter().map(|e| e.into()).collect())
    }

    // =========================================================================
    // Client Registry
    // =========================================================================

    /// Create a new client.
    pub fn create_client(&self, input: FfiClientInput) -> Result<FfiClient, VaxtrackError> {
        let db = self.db.lock()?;
        let birth_date = parse_ffi_date(&input.birth_date, "birth_date")?;
        let mut client = Client::new(input.national_id, input.name, birth_date);
        client.phone = non_empty(input.phone);
        client.email = non_empty(input.email);
        client.address = non_empty(input.address);
        client.allergy_notes = non_empty(input.allergy_notes);
        client.observations = non_empty(input.observations);
        db.insert_client(&client)?;
        Ok(client.into())
    }

    /// Update an existing client.
    pub fn update_client(&self, client: FfiClient) -> Result<bool, VaxtrackError> {
        let db = self.db.lock()?;
        let model: Client = client.try_into()?;
        Ok(db.update_client(&model)?)
    }

    /// Get a client by national ID.
    pub fn get_client(&self, national_id: String) -> Result<Option<FfiClient>, VaxtrackError> {
        let db = self.db.lock()?;
        let client = db.get_client(&national_id)?;
        Ok(client.map(|c| c.into()))
    }

    /// List all clients.
    pub fn list_clients(&self) -> Result<Vec<FfiClient>, VaxtrackError> {
        let db = self.db.lock()?;
        let clients = db.list_clients()?;
        Ok(clients.into_iter().map(|c| c.into()).collect())
    }

    /// Search clients by name.
    pub fn search_clients(
        &self,
        query: String,
        limit: u32,
    ) -> Result<Vec<FfiClient>, VaxtrackError> {
        let db = self.db.lock()?;
        let clients = search::search_clients(&db, &query, limit as usize)?;
        Ok(clients.into_iter().map(|c| c.into()).collect())
    }

    /// Activate or deactivate a client.
    pub fn set_client_active(
        &self,
        national_id: String,
        active: bool,
    ) -> Result<bool, VaxtrackError> {
        let db = self.db.lock()?;
        Ok(db.set_client_active(&national_id, active)?)
    }

    // =========================================================================
    // Vaccine Catalog
    // =========================================================================

    /// Create a new vaccine.
    pub fn create_vaccine(&self, input: FfiVaccineInput) -> Result<FfiVaccine, VaxtrackError> {
        let db = self.db.lock()?;
        let mut vaccine = Vaccine::new(
            input.name,
            input.manufacturer,
            input.doses_required,
            input.interval_days,
        );
        vaccine.category = non_empty(input.category);
        db.insert_vaccine(&vaccine)?;
        Ok(vaccine.into())
    }

    /// Update an existing vaccine.
    pub fn update_vaccine(&self, vaccine: FfiVaccine) -> Result<bool, VaxtrackError> {
        let db = self.db.lock()?;
        let model: Vaccine = vaccine.into();
        Ok(db.update_vaccine(&model)?)
    }

    /// Get a vaccine by ID.
    pub fn get_vaccine(&self, id: String) -> Result<Option<FfiVaccine>, VaxtrackError> {
        let db = self.db.lock()?;
        let vaccine = db.get_vaccine(&id)?;
        Ok(vaccine.map(|v| v.into()))
    }

    /// List vaccines.
    pub fn list_vaccines(&self, active_only: bool) -> Result<Vec<FfiVaccine>, VaxtrackError> {
        let db = self.db.lock()?;
        let vaccines = db.list_vaccines(active_only)?;
        Ok(vaccines.into_iter().map(|v| v.into()).collect())
    }

    /// Search active vaccines by name or manufacturer.
    pub fn search_vaccines(
        &self,
        query: String,
        limit: u32,
    ) -> Result<Vec<FfiVaccine>, VaxtrackError> {
        let db = self.db.lock()?;
        let vaccines = search::search_vaccines(&db, &query, limit as usize)?;
        Ok(vaccines.into_iter().map(|v| v.into()).collect())
    }

    /// Activate or deactivate a vaccine.
    pub fn set_vaccine_active(&self, id: String, active: bool) -> Result<bool, VaxtrackError> {
        let db = self.db.lock()?;
        Ok(db.set_vaccine_active(&id, active)?)
    }

    // =========================================================================
    // Batch Inventory
    // =========================================================================

    /// Register a newly purchased batch (full stock).
    pub fn create_batch(&self, input: FfiBatchInput) -> Result<FfiBatch, VaxtrackError> {
        let db = self.db.lock()?;
        let expiration = parse_ffi_date(&input.expiration_date, "expiration_date")?;
        let batch = Batch::new(
            input.vaccine_id,
            input.code,
            input.initial_quantity,
            expiration,
            input.purchase_price,
            input.sale_price,
        );
        db.insert_batch(&batch)?;
        Ok(batch.into())
    }

    /// Update batch master data (never its quantities).
    pub fn update_batch(&self, batch: FfiBatch) -> Result<bool, VaxtrackError> {
        let db = self.db.lock()?;
        let model: Batch = batch.try_into()?;
        Ok(db.update_batch(&model)?)
    }

    /// List all batches of a vaccine.
    pub fn list_batches(&self, vaccine_id: String) -> Result<Vec<FfiBatch>, VaxtrackError> {
        let db = self.db.lock()?;
        let batches = db.list_batches_for_vaccine(&vaccine_id)?;
        Ok(batches.into_iter().map(|b| b.into()).collect())
    }

    /// Batches usable for a new appointment today. May be empty; the
    /// scheduling form disables submission then.
    pub fn batches_for_scheduling(
        &self,
        vaccine_id: String,
    ) -> Result<Vec<FfiBatch>, VaxtrackError> {
        let db = self.db.lock()?;
        let batches = db.list_batches_for_vaccine(&vaccine_id)?;
        let eligible = rules::eligible_for_scheduling(&batches, self.clock.today());
        Ok(eligible.into_iter().map(|b| b.into()).collect())
    }

    /// Batches usable for an immediate application today.
    pub fn batches_for_application(
        &self,
        vaccine_id: String,
    ) -> Result<Vec<FfiBatch>, VaxtrackError> {
        let db = self.db.lock()?;
        let batches = db.list_batches_for_vaccine(&vaccine_id)?;
        let eligible = rules::eligible_for_application(&batches, self.clock.today());
        Ok(eligible.into_iter().map(|b| b.into()).collect())
    }

    /// Delete a batch. Fails while appointments or applications
    /// reference it.
    pub fn delete_batch(&self, id: String) -> Result<bool, VaxtrackError> {
        let db = self.db.lock()?;
        Ok(db.delete_batch(&id)?)
    }

    // =========================================================================
    // Appointments
    // =========================================================================

    /// Book an appointment.
    pub fn schedule_appointment(
        &self,
        input: FfiAppointmentInput,
    ) -> Result<FfiAppointment, VaxtrackError> {
        let db = self.db.lock()?;
        let scheduled_at = parse_ffi_datetime(&input.scheduled_at, "scheduled_at")?;
        let mut appointment = Appointment::new(input.client_id, input.batch_id, scheduled_at);
        appointment.notes = non_empty(input.notes);
        db.insert_appointment(&appointment)?;
        Ok(appointment.into())
    }

    /// All appointments still waiting for the client, earliest first.
    pub fn list_scheduled_appointments(&self) -> Result<Vec<FfiAppointment>, VaxtrackError> {
        let db = self.db.lock()?;
        let appointments = db.list_appointments_by_status(&AppointmentStatus::Scheduled)?;
        Ok(appointments.into_iter().map(|a| a.into()).collect())
    }

    /// Appointments on a given clinic-local day.
    pub fn appointments_for_day(
        &self,
        date: String,
    ) -> Result<Vec<FfiAppointment>, VaxtrackError> {
        let db = self.db.lock()?;
        let day = parse_ffi_date(&date, "date")?;
        let appointments = db.list_appointments_for_day(day)?;
        Ok(appointments.into_iter().map(|a| a.into()).collect())
    }

    /// A client's appointment history, most recent first.
    pub fn appointments_for_client(
        &self,
        client_id: String,
    ) -> Result<Vec<FfiAppointment>, VaxtrackError> {
        let db = self.db.lock()?;
        let appointments = db.list_appointments_for_client(&client_id)?;
        Ok(appointments.into_iter().map(|a| a.into()).collect())
    }

    /// Cancel a booking.
    pub fn cancel_appointment(&self, id: String) -> Result<bool, VaxtrackError> {
        let db = self.db.lock()?;
        Ok(db.delete_appointment(&id)?)
    }

    // =========================================================================
    // Applications
    // =========================================================================

    /// Record a vaccination, optionally auto-scheduling the next dose.
    pub fn record_application(
        &self,
        request: FfiApplicationRequest,
    ) -> Result<FfiApplicationOutcome, VaxtrackError> {
        let db = self.db.lock()?;
        let request: ApplicationRequest = request.try_into()?;
        let outcome = workflow::record_application(&db, self.clock.now(), &request)?;
        Ok(outcome.into())
    }

    /// Confirm a scheduled appointment.
    pub fn confirm_appointment(
        &self,
        request: FfiConfirmationRequest,
    ) -> Result<FfiApplication, VaxtrackError> {
        let db = self.db.lock()?;
        let request: ConfirmationRequest = request.into();
        let application = workflow::confirm_appointment(&db, self.clock.now(), &request)?;
        Ok(application.into())
    }

    /// A client's vaccination history, most recent first.
    pub fn applications_for_client(
        &self,
        client_id: String,
    ) -> Result<Vec<FfiApplication>, VaxtrackError> {
        let db = self.db.lock()?;
        let applications = db.list_applications_for_client(&client_id)?;
        Ok(applications.into_iter().map(|a| a.into()).collect())
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe session.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSession {
    pub employee_id: String,
    pub employee_name: String,
    pub role: String,
    pub issued_at: String,
    pub expires_at: String,
}

impl From<Session> for FfiSession {
    fn from(session: Session) -> Self {
        Self {
            employee_id: session.employee_id,
            employee_name: session.employee_name,
            role: session.role.as_str().to_string(),
            issued_at: format_datetime(session.issued_at),
            expires_at: format_datetime(session.expires_at),
        }
    }
}

/// FFI-safe employee registration input.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiNewEmployee {
    pub name: String,
    pub national_id: String,
    pub email: String,
    pub password: String,
}

impl From<FfiNewEmployee> for NewEmployee {
    fn from(input: FfiNewEmployee) -> Self {
        Self {
            name: input.name,
            national_id: input.national_id,
            email: input.email,
            password: input.password,
        }
    }
}

/// FFI-safe employee. The credential hash never crosses this boundary.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiEmployee {
    pub id: String,
    pub name: String,
    pub national_id: String,
    pub email: String,
    pub role: String,
    pub active: bool,
}

impl From<Employee> for FfiEmployee {
    fn from(employee: Employee) -> Self {
        Self {
            id: employee.id,
            name: employee.name,
            national_id: employee.national_id,
            email: employee.email,
            role: employee.role.as_str().to_string(),
            active: employee.active,
        }
    }
}

/// FFI-safe client creation input.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiClientInput {
    pub national_id: String,
    pub name: String,
    pub birth_date: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub allergy_notes: Option<String>,
    pub observations: Option<String>,
}

/// FFI-safe client.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiClient {
    pub national_id: String,
    pub name: String,
    pub birth_date: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub allergy_notes: Option<String>,
    pub observations: Option<String>,
    pub active: bool,
}

impl From<Client> for FfiClient {
    fn from(client: Client) -> Self {
        Self {
            national_id: client.national_id,
            name: client.name,
            birth_date: format_date(client.birth_date),
            phone: client.phone,
            email: client.email,
            address: client.address,
            allergy_notes: client.allergy_notes,
            observations: client.observations,
            active: client.active,
        }
    }
}

impl TryFrom<FfiClient> for Client {
    type Error = VaxtrackError;

    fn try_from(client: FfiClient) -> Result<Self, Self::Error> {
        let birth_date = parse_ffi_date(&client.birth_date, "birth_date")?;
        let mut model = Client::new(client.national_id, client.name, birth_date);
        model.phone = client.phone;
        model.email = client.email;
        model.address = client.address;
        model.allergy_notes = client.allergy_notes;
        model.observations = client.observations;
        model.active = client.active;
        Ok(model)
    }
}

/// FFI-safe vaccine creation input.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiVaccineInput {
    pub name: String,
    pub manufacturer: String,
    pub category: Option<String>,
    pub doses_required: u32,
    pub interval_days: u32,
}

/// FFI-safe vaccine.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiVaccine {
    pub id: String,
    pub name: String,
    pub manufacturer: String,
    pub category: Option<String>,
    pub doses_required: u32,
    pub interval_days: u32,
    pub active: bool,
}

impl From<Vaccine> for FfiVaccine {
    fn from(vaccine: Vaccine) -> Self {
        Self {
            id: vaccine.id,
            name: vaccine.name,
            manufacturer: vaccine.manufacturer,
            category: vaccine.category,
            doses_required: vaccine.doses_required,
            interval_days: vaccine.interval_days,
            active: vaccine.active,
        }
    }
}

impl From<FfiVaccine> for Vaccine {
    fn from(vaccine: FfiVaccine) -> Self {
        let mut model = Vaccine::new(
            vaccine.name,
            vaccine.manufacturer,
            vaccine.doses_required,
            vaccine.interval_days,
        );
        model.id = vaccine.id;
        model.category = vaccine.category;
        model.active = vaccine.active;
        model
    }
}

/// FFI-safe batch creation input.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiBatchInput {
    pub vaccine_id: String,
    pub code: String,
    pub initial_quantity: u32,
    pub expiration_date: String,
    pub purchase_price: f64,
    pub sale_price: f64,
}

/// FFI-safe batch.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiBatch {
    pub id: String,
    pub vaccine_id: String,
    pub code: String,
    pub initial_quantity: u32,
    pub remaining_quantity: u32,
    pub expiration_date: String,
    pub purchase_price: f64,
    pub sale_price: f64,
}

impl From<Batch> for FfiBatch {
    fn from(batch: Batch) -> Self {
        Self {
            id: batch.id,
            vaccine_id: batch.vaccine_id,
            code: batch.code,
            initial_quantity: batch.initial_quantity,
            remaining_quantity: batch.remaining_quantity,
            expiration_date: format_date(batch.expiration_date),
            purchase_price: batch.purchase_price,
            sale_price: batch.sale_price,
        }
    }
}

impl TryFrom<FfiBatch> for Batch {
    type Error = VaxtrackError;

    fn try_from(batch: FfiBatch) -> Result<Self, Self::Error> {
        let expiration = parse_ffi_date(&batch.expiration_date, "expiration_date")?;
        let mut model = Batch::new(
            batch.vaccine_id,
            batch.code,
            batch.initial_quantity.max(1),
            expiration,
            batch.purchase_price,
            batch.sale_price,
        );
        model.id = batch.id;
        model.remaining_quantity = batch.remaining_quantity;
        Ok(model)
    }
}

/// FFI-safe appointment booking input.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAppointmentInput {
    pub client_id: String,
    pub batch_id: String,
    pub scheduled_at: String,
    pub notes: Option<String>,
}

/// FFI-safe appointment.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAppointment {
    pub id: String,
    pub client_id: String,
    pub batch_id: String,
    pub employee_id: Option<String>,
    pub scheduled_at: String,
    pub status: String,
    pub notes: Option<String>,
}

impl From<Appointment> for FfiAppointment {
    fn from(appointment: Appointment) -> Self {
        let status = match appointment.status {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Completed => "completed",
        };
        Self {
            id: appointment.id,
            client_id: appointment.client_id,
            batch_id: appointment.batch_id,
            employee_id: appointment.employee_id,
            scheduled_at: format_datetime(appointment.scheduled_at),
            status: status.to_string(),
            notes: appointment.notes,
        }
    }
}

/// FFI-safe application recording request.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiApplicationRequest {
    pub client_id: Option<String>,
    pub vaccine_id: Option<String>,
    pub batch_id: Option<String>,
    pub employee_id: Option<String>,
    pub dose_number: u32,
    pub next_dose_date: Option<String>,
    pub adverse_reactions: Option<String>,
    pub notes: Option<String>,
}

impl TryFrom<FfiApplicationRequest> for ApplicationRequest {
    type Error = VaxtrackError;

    fn try_from(request: FfiApplicationRequest) -> Result<Self, Self::Error> {
        let next_dose_date = non_empty(request.next_dose_date)
            .map(|d| parse_ffi_date(&d, "next_dose_date"))
            .transpose()?;
        Ok(Self {
            client_id: request.client_id,
            vaccine_id: request.vaccine_id,
            batch_id: request.batch_id,
            employee_id: request.employee_id,
            dose_number: request.dose_number,
            next_dose_date,
            adverse_reactions: non_empty(request.adverse_reactions),
            notes: non_empty(request.notes),
        })
    }
}

/// FFI-safe application.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiApplication {
    pub id: String,
    pub client_id: String,
    pub employee_id: String,
    pub appointment_id: Option<String>,
    pub batch_id: String,
    pub applied_at: String,
    pub dose_number: u32,
    pub adverse_reactions: Option<String>,
    pub notes: Option<String>,
    pub unit_purchase_price: f64,
    pub unit_sale_price: f64,
}

impl From<Application> for FfiApplication {
    fn from(application: Application) -> Self {
        Self {
            id: application.id,
            client_id: application.client_id,
            employee_id: application.employee_id,
            appointment_id: application.appointment_id,
            batch_id: application.batch_id,
            applied_at: format_datetime(application.applied_at),
            dose_number: application.dose_number,
            adverse_reactions: application.adverse_reactions,
            notes: application.notes,
            unit_purchase_price: application.unit_purchase_price,
            unit_sale_price: application.unit_sale_price,
        }
    }
}

/// FFI-safe follow-up outcome.
#[derive(Debug, Clone, uniffi::Enum)]
pub enum FfiFollowUp {
    NotRequested,
    Scheduled { appointment: FfiAppointment },
    NoEligibleBatch { proposed_date: String },
    Failed { reason: String },
}

impl From<FollowUp> for FfiFollowUp {
    fn from(follow_up: FollowUp) -> Self {
        match follow_up {
            FollowUp::NotRequested => FfiFollowUp::NotRequested,
            FollowUp::Scheduled(appointment) => FfiFollowUp::Scheduled {
                appointment: appointment.into(),
            },
            FollowUp::NoEligibleBatch { proposed_date } => FfiFollowUp::NoEligibleBatch {
                proposed_date: format_date(proposed_date),
            },
            FollowUp::Failed { reason } => FfiFollowUp::Failed { reason },
        }
    }
}

/// FFI-safe application outcome.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiApplicationOutcome {
    pub application: FfiApplication,
    pub follow_up: FfiFollowUp,
}

impl From<ApplicationOutcome> for FfiApplicationOutcome {
    fn from(outcome: ApplicationOutcome) -> Self {
        Self {
            application: outcome.application.into(),
            follow_up: outcome.follow_up.into(),
        }
    }
}

/// FFI-safe confirmation request.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiConfirmationRequest {
    pub appointment_id: String,
    pub employee_id: Option<String>,
    pub adverse_reactions: Option<String>,
    pub notes: Option<String>,
}

impl From<FfiConfirmationRequest> for ConfirmationRequest {
    fn from(request: FfiConfirmationRequest) -> Self {
        Self {
            appointment_id: request.appointment_id,
            employee_id: request.employee_id,
            adverse_reactions: non_empty(request.adverse_reactions),
            notes: non_empty(request.notes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ffi_date() {
        assert!(parse_ffi_date("2025-07-01", "d").is_ok());
        assert!(parse_ffi_date(" 2025-07-01 ", "d").is_ok());
        assert!(parse_ffi_date("01/07/2025", "d").is_err());
    }

    #[test]
    fn test_parse_ffi_datetime_accepts_bare_date() {
        let dt = parse_ffi_datetime("2025-07-01", "d").unwrap();
        assert_eq!(format_datetime(dt), "2025-07-01T00:00:00");

        let dt = parse_ffi_datetime("2025-07-01T09:30:00", "d").unwrap();
        assert_eq!(format_datetime(dt), "2025-07-01T09:30:00");
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(None), None);
        assert_eq!(non_empty(Some("".into())), None);
        assert_eq!(non_empty(Some("  ".into())), None);
        assert_eq!(non_empty(Some(" x ".into())), Some("x".into()));
    }
}
