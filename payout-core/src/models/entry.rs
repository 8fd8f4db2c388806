use serde::{Deserialize, Serialize};

use super::Breakdown;

/// One row of the ledger: the amount text exactly as the user typed it,
/// paired with the breakdown computed from it.
///
/// Entries have no identifier; they are addressed by position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub amount: String,
    pub breakdown: Breakdown,
}

impl Entry {
    pub fn new(
        amount: impl Into<String>,
        breakdown: Breakdown,
    ) -> Self {
        Self {
            amount: amount.into(),
            breakdown,
        }
    }
}
