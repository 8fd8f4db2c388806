use std::fmt;

use rust_decimal::Decimal;

use super::Entry;
use crate::calculations::common::round_half_up;

/// Display-ready strings for one ledger row.
///
/// Percentage amount and final profit are rounded to exactly two decimal
/// places; every other number is shown at full precision. The gross amount
/// is the original input text, never renormalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRow {
    pub amount: String,
    pub percentage: String,
    pub percentage_amount: String,
    pub reduced_amount: String,
    pub daily_reductions: String,
    pub days: String,
    pub final_profit: String,
}

impl EntryRow {
    pub const HEADERS: [&'static str; 6] = [
        "Gross amount",
        "Percentage",
        "Driver earnings",
        "Fuel",
        "Days",
        "Final profit",
    ];

    pub fn from_entry(entry: &Entry) -> Self {
        let breakdown = &entry.breakdown;
        Self {
            amount: entry.amount.clone(),
            percentage: format!("{}%", breakdown.percentage),
            percentage_amount: two_places(breakdown.percentage_amount),
            reduced_amount: full_precision(breakdown.reduced_amount),
            daily_reductions: breakdown
                .daily_reductions
                .iter()
                .map(|d| full_precision(*d))
                .collect::<Vec<_>>()
                .join(", "),
            days: breakdown.days.to_string(),
            final_profit: two_places(breakdown.final_profit),
        }
    }

    /// Cells in the order of [`EntryRow::HEADERS`].
    pub fn cells(&self) -> [&str; 6] {
        [
            &self.amount,
            &self.percentage,
            &self.percentage_amount,
            &self.daily_reductions,
            &self.days,
            &self.final_profit,
        ]
    }
}

impl From<&Entry> for EntryRow {
    fn from(entry: &Entry) -> Self {
        Self::from_entry(entry)
    }
}

fn two_places(value: Decimal) -> String {
    format!("{:.2}", round_half_up(value))
}

fn full_precision(value: Decimal) -> String {
    value.normalize().to_string()
}

impl fmt::Display for EntryRow {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(f, "Gross amount:    {}", self.amount)?;
        writeln!(f, "Percentage:      {}", self.percentage)?;
        writeln!(f, "Driver earnings: {}", self.percentage_amount)?;
        writeln!(f, "Reduced amount:  {}", self.reduced_amount)?;
        writeln!(f, "Fuel:            {}", self.daily_reductions)?;
        writeln!(f, "Days:            {}", self.days)?;
        write!(f, "Final profit:    {}", self.final_profit)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::Breakdown;

    fn entry(
        amount: &str,
        percentage_amount: Decimal,
        final_profit: Decimal,
    ) -> Entry {
        Entry::new(
            amount,
            Breakdown {
                percentage: 40,
                percentage_amount,
                reduced_amount: dec!(3000),
                daily_reductions: vec![dec!(1000)],
                days: 1,
                final_profit,
            },
        )
    }

    #[test]
    fn rounds_money_columns_to_two_places() {
        let row = EntryRow::from_entry(&entry("5000", dec!(2000), dec!(2000)));

        assert_eq!(row.percentage_amount, "2000.00");
        assert_eq!(row.final_profit, "2000.00");
    }

    #[test]
    fn rounds_half_away_from_zero() {
        let row = EntryRow::from_entry(&entry("x", dec!(1234.565), dec!(-0.125)));

        assert_eq!(row.percentage_amount, "1234.57");
        assert_eq!(row.final_profit, "-0.13");
    }

    #[test]
    fn keeps_amount_text_as_entered() {
        let row = EntryRow::from_entry(&entry("05000.0", dec!(2000), dec!(2000)));

        assert_eq!(row.amount, "05000.0");
    }

    #[test]
    fn formats_percentage_days_and_reductions() {
        let mut e = entry("5000", dec!(2000), dec!(2000));
        e.breakdown.daily_reductions = vec![dec!(1000.00), dec!(250.5)];

        let row = EntryRow::from_entry(&e);

        assert_eq!(row.percentage, "40%");
        assert_eq!(row.days, "1");
        assert_eq!(row.daily_reductions, "1000, 250.5");
        assert_eq!(row.reduced_amount, "3000");
    }

    #[test]
    fn cells_follow_header_order() {
        let row = EntryRow::from_entry(&entry("5000", dec!(2000), dec!(2000)));

        assert_eq!(
            row.cells(),
            ["5000", "40%", "2000.00", "1000", "1", "2000.00"]
        );
    }
}
