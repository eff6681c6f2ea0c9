//! Vaccine batch (lot) models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A purchased batch of a vaccine.
///
/// Invariant: `0 <= remaining_quantity <= initial_quantity`. The database
/// schema enforces it; `remaining_quantity` only decreases through the
/// application-insert trigger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Batch {
    /// Unique batch ID
    pub id: String,
    /// Owning vaccine
    pub vaccine_id: String,
    /// Manufacturer batch code (unique per vaccine)
    pub code: String,
    /// Doses purchased (> 0)
    pub initial_quantity: u32,
    /// Doses still in stock
    pub remaining_quantity: u32,
    /// Expiration date
    pub expiration_date: NaiveDate,
    /// Purchase cost of the whole batch
    pub purchase_price: f64,
    /// Sale price per dose
    pub sale_price: f64,
    /// Creation timestamp
    pub created_at: String,
    /// Last update timestamp
    pub updated_at: String,
}

impl Batch {
    /// Create a new batch with full stock.
    pub fn new(
        vaccine_id: String,
        code: String,
        initial_quantity: u32,
        expiration_date: NaiveDate,
        purchase_price: f64,
        sale_price: f64,
    ) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            vaccine_id,
            code,
            initial_quantity,
            remaining_quantity: initial_quantity,
            expiration_date,
            purchase_price,
            sale_price,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Whether any doses remain.
    pub fn has_stock(&self) -> bool {
        self.remaining_quantity > 0
    }

    /// Historical per-dose cost: whole-batch purchase price divided by
    /// the initial quantity. Snapshotted into each application record.
    pub fn unit_purchase_price(&self) -> f64 {
        self.purchase_price / f64::from(self.initial_quantity.max(1))
    }
}
