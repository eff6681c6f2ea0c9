//! Batch eligibility rules.
//!
//! Expiry is evaluated at day granularity in the clinic timezone, with
//! one deliberate asymmetry carried over from the business rules:
//! scheduling treats a batch as usable through the last moment of its
//! expiration day, while immediate application treats it as expired the
//! moment that day begins.

use chrono::NaiveDate;

use crate::models::Batch;

/// Whether a batch may back a new appointment on `today`.
///
/// End-of-day expiry: the expiration day itself still qualifies.
pub fn usable_for_scheduling(batch: &Batch, today: NaiveDate) -> bool {
    batch.has_stock() && today <= batch.expiration_date
}

/// Whether a batch may back an immediate application on `today`.
///
/// Start-of-day expiry: the batch is out as soon as the expiration day
/// begins.
pub fn usable_for_application(batch: &Batch, today: NaiveDate) -> bool {
    batch.has_stock() && today < batch.expiration_date
}

/// Batches usable for a new appointment, soonest expiration first.
/// The empty list is a valid result; the form disables submission.
pub fn eligible_for_scheduling(batches: &[Batch], today: NaiveDate) -> Vec<Batch> {
    let mut eligible: Vec<Batch> = batches
        .iter()
        .filter(|b| usable_for_scheduling(b, today))
        .cloned()
        .collect();
    eligible.sort_by(|a, b| {
        a.expiration_date
            .cmp(&b.expiration_date)
            .then_with(|| a.code.cmp(&b.code))
    });
    eligible
}

/// Batches usable for an immediate application, soonest expiration
/// first.
pub fn eligible_for_application(batches: &[Batch], today: NaiveDate) -> Vec<Batch> {
    let mut eligible: Vec<Batch> = batches
        .iter()
        .filter(|b| usable_for_application(b, today))
        .cloned()
        .collect();
    eligible.sort_by(|a, b| {
        a.expiration_date
            .cmp(&b.expiration_date)
            .then_with(|| a.code.cmp(&b.code))
    });
    eligible
}

/// Pick the batch backing an automatic follow-up appointment on
/// `proposed_date`: stock remaining, expiration on or after the
/// proposed date, latest expiration wins (arbitrary among ties).
pub fn select_follow_up_batch(batches: &[Batch], proposed_date: NaiveDate) -> Option<&Batch> {
    batches
        .iter()
        .filter(|b| b.has_stock() && b.expiration_date >= proposed_date)
        .max_by_key(|b| b.expiration_date)
}
