use rust_decimal::Decimal;
use thiserror::Error;

/// Error returned when amount text is present but is not a number.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid amount '{input}'")]
pub struct ParseAmountError {
    pub input: String,
}

/// Parses user-entered amount text.
///
/// Surrounding whitespace is ignored. Empty or whitespace-only input yields
/// `Ok(None)`: nothing was entered. Plain decimals (`"5000"`, `"-12.5"`) and
/// scientific notation (`"5e3"`) are accepted.
///
/// Amounts are held as [`Decimal`], which bounds what parses:
/// * at most 28 fractional digits; extra digits are rounded away, so
///   `"0.00000000000000000000000000001"` parses as zero;
/// * magnitudes above [`Decimal::MAX`] (about `7.9e28`) are rejected as
///   invalid.
pub fn parse_amount(raw: &str) -> Result<Option<Decimal>, ParseAmountError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    trimmed
        .parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map(Some)
        .map_err(|e| {
            tracing::debug!(input = %raw, "invalid amount: {}", e);
            ParseAmountError {
                input: raw.to_string(),
            }
        })
}
