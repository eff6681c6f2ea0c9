//! Property tests for the vaccination rules.

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

use vaxtrack_core::models::{Batch, Vaccine};
use vaxtrack_core::rules::{
    eligible_for_application, eligible_for_scheduling, select_follow_up_batch,
    validate_next_dose_date,
};

fn base_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
}

fn make_vaccine(doses: u32, interval: u32) -> Vaccine {
    Vaccine::new("Tetravalent".into(), "BioPharm".into(), doses, interval)
}

fn make_batch(code: &str, initial: u32, remaining: u32, expiration: NaiveDate) -> Batch {
    let mut batch = Batch::new("vac-1".into(), code.into(), initial, expiration, 100.0, 30.0);
    batch.remaining_quantity = remaining;
    batch
}

proptest! {
    /// Any next-dose date earlier than today + interval is rejected for
    /// multi-dose vaccines with a positive interval.
    #[test]
    fn interval_violations_always_rejected(
        interval in 1u32..365,
        offset in 0i64..365,
    ) {
        prop_assume!(offset < i64::from(interval));
        let vaccine = make_vaccine(2, interval);
        let today = base_day();
        let proposed = today + Duration::days(offset);

        prop_assert!(validate_next_dose_date(&vaccine, today, proposed).is_err());
    }

    /// Any next-dose date at or past today + interval is accepted.
    #[test]
    fn interval_satisfied_always_accepted(
        interval in 1u32..365,
        slack in 0i64..365,
    ) {
        let vaccine = make_vaccine(2, interval);
        let today = base_day();
        let proposed = today + Duration::days(i64::from(interval) + slack);

        prop_assert!(validate_next_dose_date(&vaccine, today, proposed).is_ok());
    }

    /// Without an interval constraint, any strictly-future date is
    /// accepted and today or earlier is rejected.
    #[test]
    fn unconstrained_course_only_needs_future(
        doses in 0u32..2,
        offset in -365i64..365,
    ) {
        let vaccine = make_vaccine(doses, 0);
        let today = base_day();
        let proposed = today + Duration::days(offset);

        let result = validate_next_dose_date(&vaccine, today, proposed);
        if offset > 0 {
            prop_assert!(result.is_ok());
        } else {
            prop_assert!(result.is_err());
        }
    }

    /// Eligible batch lists never contain empty or over-full batches,
    /// and application eligibility is a subset of scheduling
    /// eligibility.
    #[test]
    fn eligibility_respects_stock_invariant(
        remaining in 0u32..10,
        initial in 1u32..10,
        expiry_offset in -30i64..30,
    ) {
        prop_assume!(remaining <= initial);
        let today = base_day();
        let batch = make_batch("L001", initial, remaining, today + Duration::days(expiry_offset));
        let batches = vec![batch];

        let scheduling = eligible_for_scheduling(&batches, today);
        let application = eligible_for_application(&batches, today);

        for b in scheduling.iter().chain(application.iter()) {
            prop_assert!(b.remaining_quantity > 0);
            prop_assert!(b.remaining_quantity <= b.initial_quantity);
        }

        // Start-of-day expiry is strictly tighter than end-of-day
        prop_assert!(application.len() <= scheduling.len());
    }

    /// The follow-up choice always has stock, covers the proposed date,
    /// and no candidate expires later.
    #[test]
    fn follow_up_choice_is_maximal(
        expirations in prop::collection::vec(0i64..200, 1..8),
        proposed_offset in 0i64..100,
    ) {
        let today = base_day();
        let proposed = today + Duration::days(proposed_offset);
        let batches: Vec<Batch> = expirations
            .iter()
            .enumerate()
            .map(|(i, offset)| {
                make_batch(&format!("L{:03}", i), 5, 5, today + Duration::days(*offset))
            })
            .collect();

        match select_follow_up_batch(&batches, proposed) {
            Some(chosen) => {
                prop_assert!(chosen.has_stock());
                prop_assert!(chosen.expiration_date >= proposed);
                for b in &batches {
                    if b.has_stock() && b.expiration_date >= proposed {
                        prop_assert!(b.expiration_date <= chosen.expiration_date);
                    }
                }
            }
            None => {
                for b in &batches {
                    prop_assert!(!b.has_stock() || b.expiration_date < proposed);
                }
            }
        }
    }
}
