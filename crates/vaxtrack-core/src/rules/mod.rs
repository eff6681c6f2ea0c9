//! Vaccination consistency rules.
//!
//! The one part of the system with real invariants: which batches may
//! be offered for scheduling or immediate application, which batch
//! backs an automatic follow-up, and how far apart doses must be.

mod dose_interval;
mod eligibility;

pub use dose_interval::*;
pub use eligibility::*;
