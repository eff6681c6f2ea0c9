//! Clinic configuration.
//!
//! Replaces the ambient globals of a browser client with one explicit,
//! serde-loadable struct: the clinic reference timezone, the session
//! TTL, and the credential hashing cost.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::clock::ClinicClock;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("UTC offset out of range: {0}")]
    InvalidOffset(i32),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

fn default_utc_offset_hours() -> i32 {
    -3
}

fn default_session_ttl_minutes() -> u32 {
    480
}

fn default_bcrypt_cost() -> u32 {
    bcrypt::DEFAULT_COST
}

/// Clinic-wide settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClinicConfig {
    /// Fixed UTC offset of the clinic timezone. All business-date
    /// comparisons use this zone, never the host's local zone.
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,

    /// How long an authenticated session stays valid.
    #[serde(default = "default_session_ttl_minutes")]
    pub session_ttl_minutes: u32,

    /// bcrypt cost for employee credential hashing.
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

impl Default for ClinicConfig {
    fn default() -> Self {
        Self {
            utc_offset_hours: default_utc_offset_hours(),
            session_ttl_minutes: default_session_ttl_minutes(),
            bcrypt_cost: default_bcrypt_cost(),
        }
    }
}

impl ClinicConfig {
    /// Load configuration from a JSON file, applying defaults for
    /// missing fields.
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject offsets a fixed-offset timezone cannot represent.
    pub fn validate(&self) -> ConfigResult<()> {
        if ClinicClock::from_utc_offset_hours(self.utc_offset_hours).is_none() {
            return Err(ConfigError::InvalidOffset(self.utc_offset_hours));
        }
        Ok(())
    }

    /// The clock for the clinic reference timezone.
    pub fn clock(&self) -> ClinicClock {
        ClinicClock::from_utc_offset_hours(self.utc_offset_hours).unwrap_or_default()
    }
}
