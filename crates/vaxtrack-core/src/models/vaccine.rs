//! Vaccine catalog models.

use serde::{Deserialize, Serialize};

/// A vaccine in the clinic catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Vaccine {
    /// Unique vaccine ID
    pub id: String,
    /// Commercial name
    pub name: String,
    /// Manufacturer
    pub manufacturer: String,
    /// Category (e.g. "viral", "bacterial")
    pub category: Option<String>,
    /// Number of doses in a complete course (>= 1)
    pub doses_required: u32,
    /// Minimum days between doses; 0 means no interval constraint
    pub interval_days: u32,
    /// Whether the vaccine is currently offered
    pub active: bool,
    /// Creation timestamp
    pub created_at: String,
    /// Last update timestamp
    pub updated_at: String,
}

impl Vaccine {
    /// Create a new active vaccine with required fields.
    pub fn new(name: String, manufacturer: String, doses_required: u32, interval_days: u32) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            manufacturer,
            category: None,
            doses_required: doses_required.max(1),
            interval_days,
            active: true,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Whether recording a dose must respect a minimum spacing.
    pub fn has_interval_constraint(&self) -> bool {
        self.doses_required > 1 && self.interval_days > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_vaccine() {
        let vaccine = Vaccine::new("Tetravalent".into(), "BioPharm".into(), 2, 21);
        assert_eq!(vaccine.doses_required, 2);
        assert_eq!(vaccine.interval_days, 21);
        assert!(vaccine.active);
        assert_eq!(vaccine.id.len(), 36);
    }

    #[test]
    fn test_doses_required_floor() {
        let vaccine = Vaccine::new("Single".into(), "BioPharm".into(), 0, 0);
        assert_eq!(vaccine.doses_required, 1);
    }

    #[test]
    fn test_interval_constraint() {
        assert!(Vaccine::new("A".into(), "M".into(), 2, 21).has_interval_constraint());
        assert!(!Vaccine::new("B".into(), "M".into(), 1, 21).has_interval_constraint());
        assert!(!Vaccine::new("C".into(), "M".into(), 3, 0).has_interval_constraint());
    }
}
