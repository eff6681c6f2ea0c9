//! Clinic reference clock.
//!
//! The clinic operates in a single timezone; every business-date
//! comparison (batch expiry, dose intervals, "today") goes through this
//! clock instead of the host machine's local zone.

use chrono::{Duration, NaiveDate, NaiveDateTime, Utc};

/// A clock pinned to the clinic's fixed UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClinicClock {
    offset_seconds: i32,
}

impl Default for ClinicClock {
    fn default() -> Self {
        // UTC-3; matches the default in ClinicConfig
        Self {
            offset_seconds: -3 * 3600,
        }
    }
}

impl ClinicClock {
    /// Build a clock from a whole-hour UTC offset. Offsets must stay
    /// within what a fixed-offset timezone can represent.
    pub fn from_utc_offset_hours(hours: i32) -> Option<Self> {
        if !(-23..=23).contains(&hours) {
            return None;
        }
        Some(Self {
            offset_seconds: hours * 3600,
        })
    }

    /// Current clinic-local date and time.
    pub fn now(&self) -> NaiveDateTime {
        Utc::now().naive_utc() + Duration::seconds(i64::from(self.offset_seconds))
    }

    /// Current clinic-local date.
    pub fn today(&self) -> NaiveDate {
        self.now().date()
    }
}
