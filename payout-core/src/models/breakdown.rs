use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Everything derived from one gross amount.
///
/// Field names are serialized in camelCase so records written by the
/// browser version of the calculator load unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Breakdown {
    /// Tier percentage (20, 25, 30, 35 or 40; 0 when no tier matched).
    pub percentage: u32,
    /// `amount * percentage / 100`.
    pub percentage_amount: Decimal,
    /// `amount - percentage_amount`.
    pub reduced_amount: Decimal,
    pub daily_reductions: Vec<Decimal>,
    pub days: u32,
    /// `reduced_amount - sum(daily_reductions)`.
    pub final_profit: Decimal,
}

impl Breakdown {
    /// Sum of all daily reductions.
    pub fn total_daily_reductions(&self) -> Decimal {
        self.daily_reductions.iter().copied().sum()
    }
}
