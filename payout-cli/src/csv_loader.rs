//! CSV import and export of ledger entries.
//!
//! ## Import format
//!
//! One required column, `amount`, matched by header name; other columns are
//! ignored. Cells are kept as raw text and parsed the same way as amounts
//! typed on the command line. Empty cells are allowed and skipped on
//! import.
//!
//! ```csv
//! date,amount
//! 2025-03-01,5000
//! 2025-03-02,3000.50
//! ```
//!
//! ## Export format
//!
//! `index,amount,percentage,percentage_amount,reduced_amount,daily_reductions,days,final_profit`
//! with the same rounding as the on-screen table.

use std::io::{Read, Write};
use std::path::Path;

use payout_core::utils::{ParseAmountError, parse_amount};
use payout_core::{Entry, EntryRow};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
struct AmountRow {
    amount: String,
}

#[derive(Debug, Serialize)]
struct ExportRow {
    index: usize,
    amount: String,
    percentage: String,
    percentage_amount: String,
    reduced_amount: String,
    daily_reductions: String,
    days: String,
    final_profit: String,
}

impl ExportRow {
    fn new(
        index: usize,
        row: EntryRow,
    ) -> Self {
        Self {
            index,
            amount: row.amount,
            percentage: row.percentage,
            percentage_amount: row.percentage_amount,
            reduced_amount: row.reduced_amount,
            daily_reductions: row.daily_reductions,
            days: row.days,
            final_profit: row.final_profit,
        }
    }
}

/// Errors that can occur while reading or writing CSV data.
#[derive(Debug, thiserror::Error)]
pub enum CsvLoadError {
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    #[error("row {row}: {source}")]
    InvalidAmount {
        row: usize,
        #[source]
        source: ParseAmountError,
    },

    #[error("cannot access '{}': {source}", path.display())]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Reads the `amount` column in file order.
///
/// Every non-empty cell must parse as a number; the first one that does not
/// is reported with its 1-based row number. Empty cells come back as empty
/// strings.
pub fn read_amounts<R: Read>(reader: R) -> Result<Vec<String>, CsvLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    reader
        .deserialize::<AmountRow>()
        .enumerate()
        .map(|(idx, result)| {
            let amount = result?.amount;
            parse_amount(&amount).map_err(|source| CsvLoadError::InvalidAmount {
                row: idx + 1,
                source,
            })?;
            Ok(amount)
        })
        .collect()
}

pub fn read_amounts_from_file(path: &Path) -> Result<Vec<String>, CsvLoadError> {
    let file = std::fs::File::open(path).map_err(|source| CsvLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_amounts(file)
}

/// Writes one CSV record per entry, with a header.
pub fn write_entries<W: Write>(
    writer: W,
    entries: &[Entry],
) -> Result<(), CsvLoadError> {
    let mut writer = csv::Writer::from_writer(writer);
    for (index, entry) in entries.iter().enumerate() {
        writer.serialize(ExportRow::new(index, EntryRow::from_entry(entry)))?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

pub fn write_entries_to_file(
    path: &Path,
    entries: &[Entry],
) -> Result<(), CsvLoadError> {
    let file = std::fs::File::create(path).map_err(|source| CsvLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write_entries(file, entries)
}

#[cfg(test)]
mod tests {
    use payout_core::TierCalculator;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn reads_amount_column_in_order() {
        let csv = "amount\n5000\n3000.50\n2000\n";

        let amounts = read_amounts(csv.as_bytes()).unwrap();

        assert_eq!(amounts, vec!["5000", "3000.50", "2000"]);
    }

    #[test]
    fn ignores_other_columns_and_order() {
        let csv = "date,amount,note\n2025-03-01,5000,first\n2025-03-02, 2500 ,second\n";

        let amounts = read_amounts(csv.as_bytes()).unwrap();

        assert_eq!(amounts, vec!["5000", "2500"]);
    }

    #[test]
    fn keeps_empty_cells_as_empty_strings() {
        let csv = "date,amount\n2025-03-01,\n2025-03-02,4000\n";

        let amounts = read_amounts(csv.as_bytes()).unwrap();

        assert_eq!(amounts, vec!["", "4000"]);
    }

    #[test]
    fn reports_row_of_invalid_amount() {
        let csv = "amount\n5000\nlots\n";

        let err = read_amounts(csv.as_bytes()).unwrap_err();

        match err {
            CsvLoadError::InvalidAmount { row, source } => {
                assert_eq!(row, 2);
                assert_eq!(source.input, "lots");
            }
            other => panic!("expected InvalidAmount, got {other:?}"),
        }
    }

    #[test]
    fn missing_amount_column_is_a_parse_error() {
        let csv = "total\n5000\n";

        let result = read_amounts(csv.as_bytes());

        assert!(matches!(result, Err(CsvLoadError::Parse(_))));
    }

    #[test]
    fn headers_only_gives_no_rows() {
        assert!(read_amounts("amount\n".as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn writes_rendered_rows() {
        let calc = TierCalculator::standard();
        let entries = vec![
            Entry::new("5000", calc.compute(dec!(5000))),
            Entry::new("3333.33", calc.compute(dec!(3333.33))),
        ];
        let mut out = Vec::new();

        write_entries(&mut out, &entries).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "index,amount,percentage,percentage_amount,reduced_amount,daily_reductions,days,final_profit",
                "0,5000,40%,2000.00,3000,1000,1,2000.00",
                "1,3333.33,30%,1000.00,2333.331,1000,1,1333.33",
            ]
        );
    }
}
