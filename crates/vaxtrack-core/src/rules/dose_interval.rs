//! Dose-interval validation.

use chrono::{Duration, NaiveDate};
use thiserror::Error;

use crate::models::Vaccine;

/// A rejected next-dose date. The messages carry the computed bound so
/// the form can tell the user the earliest acceptable date.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DoseIntervalError {
    #[error("next dose must be on or after {minimum}")]
    TooSoon { minimum: NaiveDate },

    #[error("next dose must be after {today}")]
    NotInFuture { today: NaiveDate },
}

/// Validate a proposed next-dose date against the vaccine's course,
/// at day granularity in the clinic timezone.
///
/// Multi-dose vaccines with a positive interval require
/// `proposed >= today + interval_days`; everything else only requires a
/// date strictly in the future.
pub fn validate_next_dose_date(
    vaccine: &Vaccine,
    today: NaiveDate,
    proposed: NaiveDate,
) -> Result<(), DoseIntervalError> {
    if vaccine.has_interval_constraint() {
        let minimum = today + Duration::days(i64::from(vaccine.interval_days));
        if proposed < minimum {
            return Err(DoseIntervalError::TooSoon { minimum });
        }
        return Ok(());
    }

    if proposed <= today {
        return Err(DoseIntervalError::NotInFuture { today });
    }
    Ok(())
}
