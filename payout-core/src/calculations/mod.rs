//! Payout calculations.
//!
//! The tier lookup maps a gross amount to a percentage; the calculator turns
//! that into a full [`Breakdown`](crate::Breakdown).

pub mod common;
pub mod tier;

pub use tier::{ReductionPolicy, Tier, TierCalculator, TierSchedule};
