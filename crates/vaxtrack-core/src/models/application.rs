//! Vaccination application (event) models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::Batch;

/// A recorded vaccination.
///
/// `unit_purchase_price` and `unit_sale_price` are snapshots of the batch
/// prices at recording time; later batch price edits never rewrite them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Application {
    /// Unique application ID
    pub id: String,
    /// Client national ID
    pub client_id: String,
    /// Employee who administered the dose
    pub employee_id: String,
    /// Originating appointment, if any
    pub appointment_id: Option<String>,
    /// Batch the dose was drawn from
    pub batch_id: String,
    /// When the dose was applied, clinic-local
    pub applied_at: NaiveDateTime,
    /// Dose number within the vaccine course (>= 1)
    pub dose_number: u32,
    /// Observed adverse reactions
    pub adverse_reactions: Option<String>,
    /// Free-text notes
    pub notes: Option<String>,
    /// Per-dose purchase cost at recording time
    pub unit_purchase_price: f64,
    /// Per-dose sale price at recording time
    pub unit_sale_price: f64,
    /// Creation timestamp
    pub created_at: String,
}

impl Application {
    /// Build an application against a batch, snapshotting its prices.
    pub fn for_batch(
        client_id: String,
        employee_id: String,
        batch: &Batch,
        appointment_id: Option<String>,
        applied_at: NaiveDateTime,
        dose_number: u32,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            client_id,
            employee_id,
            appointment_id,
            batch_id: batch.id.clone(),
            applied_at,
            dose_number: dose_number.max(1),
            adverse_reactions: None,
            notes: None,
            unit_purchase_price: batch.unit_purchase_price(),
            unit_sale_price: batch.sale_price,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
