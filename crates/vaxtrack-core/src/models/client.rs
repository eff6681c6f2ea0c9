//! Client registry models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A clinic client, keyed by national ID.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Client {
    /// National ID - the primary key of the registry
    pub national_id: String,
    /// Full name
    pub name: String,
    /// Birth date
    pub birth_date: NaiveDate,
    /// Contact phone
    pub phone: Option<String>,
    /// Contact email
    pub email: Option<String>,
    /// Street address
    pub address: Option<String>,
    /// Known allergies relevant to vaccination
    pub allergy_notes: Option<String>,
    /// Free-text observations
    pub observations: Option<String>,
    /// Whether the client is active in the registry
    pub active: bool,
    /// Creation timestamp
    pub created_at: String,
    /// Last update timestamp
    pub updated_at: String,
}

impl Client {
    /// Create a new active client with required fields.
    pub fn new(national_id: String, name: String, birth_date: NaiveDate) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            national_id,
            name,
            birth_date,
            phone: None,
            email: None,
            address: None,
            allergy_notes: None,
            observations: None,
            active: true,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Age in whole years on the given date.
    pub fn age_on(&self, date: NaiveDate) -> u32 {
        let years = date.years_since(self.birth_date);
        years.unwrap_or(0)
    }
}
