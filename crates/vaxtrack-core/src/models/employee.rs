//! Employee models and credential handling.

use bcrypt::BcryptError;
use serde::{Deserialize, Serialize};

/// Employee role. The current model grants every employee the single
/// elevated role.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum EmployeeRole {
    /// Full access to every registry and workflow
    Admin,
}

impl EmployeeRole {
    /// Canonical string form, as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            EmployeeRole::Admin => "admin",
        }
    }
}

/// Input for registering a new employee. Holds the plaintext password
/// only until it is hashed; never stored or serialized onward.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEmployee {
    pub name: String,
    pub national_id: String,
    pub email: String,
    pub password: String,
}

/// A stored employee. Carries the credential hash, never the plaintext.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Employee {
    /// Unique employee ID
    pub id: String,
    /// Full name
    pub name: String,
    /// National ID (unique)
    pub national_id: String,
    /// Login email (unique)
    pub email: String,
    /// bcrypt hash of the password
    pub password_hash: String,
    /// Role
    pub role: EmployeeRole,
    /// Whether the employee may authenticate
    pub active: bool,
    /// Creation timestamp
    pub created_at: String,
    /// Last update timestamp
    pub updated_at: String,
}

impl Employee {
    /// Hash a plaintext password at the given bcrypt cost.
    pub fn hash_password(password: &str, cost: u32) -> Result<String, BcryptError> {
        bcrypt::hash(password, cost)
    }

    /// Verify a plaintext password against the stored hash.
    pub fn verify_password(&self, password: &str) -> Result<bool, BcryptError> {
        bcrypt::verify(password, &self.password_hash)
    }

    /// Build a stored employee from registration input, hashing the
    /// password.
    pub fn from_new(new: NewEmployee, cost: u32) -> Result<Self, BcryptError> {
        let now = chrono::Utc::now().to_rfc3339();
        let password_hash = Self::hash_password(&new.password, cost)?;
        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: new.name,
            national_id: new.national_id,
            email: new.email,
            password_hash,
            role: EmployeeRole::Admin,
            active: true,
            created_at: now.clone(),
            updated_at: now,
        })
    }
}
