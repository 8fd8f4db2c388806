//! Tiered percentage lookup and payout breakdown.
//!
//! A gross amount is matched against an ordered list of tiers; the first
//! tier whose bounds contain the amount supplies the percentage. The
//! percentage share is split off, then the fixed daily reductions are
//! subtracted to give the final profit.
//!
//! # Standard schedule
//!
//! | Condition                | Percentage |
//! |--------------------------|------------|
//! | amount > 6500            | 40         |
//! | 4900 < amount <= 6500    | 40         |
//! | 3700 < amount <= 4900    | 35         |
//! | 2700 < amount <= 3700    | 30         |
//! | 2200 < amount <= 2200    | 25         |
//! | amount <= 2200           | 20         |
//! | no match                 | 0          |
//!
//! The 25% tier has an empty range and never matches. Amounts in
//! `(2200, 2700]` fall through every tier and get the 0% fallback.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use payout_core::TierCalculator;
//!
//! let breakdown = TierCalculator::standard().compute(dec!(5000));
//!
//! assert_eq!(breakdown.percentage, 40);
//! assert_eq!(breakdown.percentage_amount, dec!(2000));
//! assert_eq!(breakdown.reduced_amount, dec!(3000));
//! assert_eq!(breakdown.final_profit, dec!(2000));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::Breakdown;

/// One bucket of the schedule: `lower < amount <= upper`.
///
/// A missing bound is open on that side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tier {
    /// Exclusive lower bound.
    pub lower: Option<Decimal>,
    /// Inclusive upper bound.
    pub upper: Option<Decimal>,
    pub percentage: u32,
}

impl Tier {
    pub fn new(
        lower: Option<Decimal>,
        upper: Option<Decimal>,
        percentage: u32,
    ) -> Self {
        Self {
            lower,
            upper,
            percentage,
        }
    }

    pub fn contains(
        &self,
        amount: Decimal,
    ) -> bool {
        self.lower.is_none_or(|lower| amount > lower)
            && self.upper.is_none_or(|upper| amount <= upper)
    }
}

/// Ordered tiers, evaluated first match wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierSchedule {
    pub tiers: Vec<Tier>,
    /// Percentage used when no tier matches.
    pub fallback: u32,
}

impl TierSchedule {
    /// The production schedule, clause for clause.
    pub fn standard() -> Self {
        let d = |value: i64| Decimal::from(value);
        Self {
            tiers: vec![
                Tier::new(Some(d(6500)), None, 40),
                Tier::new(Some(d(4900)), Some(d(6500)), 40),
                Tier::new(Some(d(3700)), Some(d(4900)), 35),
                Tier::new(Some(d(2700)), Some(d(3700)), 30),
                Tier::new(Some(d(2200)), Some(d(2200)), 25),
                Tier::new(None, Some(d(2200)), 20),
            ],
            fallback: 0,
        }
    }

    pub fn percentage_for(
        &self,
        amount: Decimal,
    ) -> u32 {
        match self.tiers.iter().find(|tier| tier.contains(amount)) {
            Some(tier) => tier.percentage,
            None => {
                debug!(%amount, fallback = self.fallback, "no tier matched");
                self.fallback
            }
        }
    }
}

impl Default for TierSchedule {
    fn default() -> Self {
        Self::standard()
    }
}

/// Reductions charged against the reduced amount.
///
/// The standard policy is a single fixed reduction of 1000 over one day,
/// independent of the amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReductionPolicy {
    pub daily_reductions: Vec<Decimal>,
    pub days: u32,
}

impl ReductionPolicy {
    pub fn standard() -> Self {
        Self {
            daily_reductions: vec![Decimal::ONE_THOUSAND],
            days: 1,
        }
    }
}

impl Default for ReductionPolicy {
    fn default() -> Self {
        Self::standard()
    }
}

/// Pure mapping from a gross amount to a [`Breakdown`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TierCalculator {
    schedule: TierSchedule,
    policy: ReductionPolicy,
}

impl TierCalculator {
    pub fn new(
        schedule: TierSchedule,
        policy: ReductionPolicy,
    ) -> Self {
        Self { schedule, policy }
    }

    /// Standard schedule with the standard reduction policy.
    pub fn standard() -> Self {
        Self::new(TierSchedule::standard(), ReductionPolicy::standard())
    }

    pub fn schedule(&self) -> &TierSchedule {
        &self.schedule
    }

    pub fn policy(&self) -> &ReductionPolicy {
        &self.policy
    }

    pub fn percentage_for(
        &self,
        amount: Decimal,
    ) -> u32 {
        self.schedule.percentage_for(amount)
    }

    /// Computes the breakdown for `amount`.
    ///
    /// Never fails. Zero and negative amounts produce a breakdown like any
    /// other; negatives are logged. Values keep full precision; rounding is
    /// left to display code.
    ///
    /// `final_profit` is `reduced_amount - sum(daily_reductions)`, except
    /// that a result below [`Decimal::MIN`] saturates there instead of
    /// overflowing.
    pub fn compute(
        &self,
        amount: Decimal,
    ) -> Breakdown {
        if amount.is_sign_negative() && !amount.is_zero() {
            warn!(%amount, "computing breakdown for a negative amount");
        }

        let percentage = self.percentage_for(amount);
        let percentage_amount = percent_of(amount, percentage);
        let reduced_amount = amount - percentage_amount;
        let daily_reductions = self.policy.daily_reductions.clone();
        let total: Decimal = daily_reductions.iter().copied().sum();
        let final_profit = reduced_amount.saturating_sub(total);

        debug!(
            %amount,
            percentage,
            %percentage_amount,
            %reduced_amount,
            %final_profit,
            "computed breakdown"
        );

        Breakdown {
            percentage,
            percentage_amount,
            reduced_amount,
            daily_reductions,
            days: self.policy.days,
            final_profit,
        }
    }
}

/// `amount * percentage / 100`, dividing first only when the product
/// would overflow.
fn percent_of(
    amount: Decimal,
    percentage: u32,
) -> Decimal {
    let percentage = Decimal::from(percentage);
    match amount.checked_mul(percentage) {
        Some(product) => product / Decimal::ONE_HUNDRED,
        None => amount / Decimal::ONE_HUNDRED * percentage,
    }
}
