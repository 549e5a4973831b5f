use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use thiserror::Error;

/// Error returned when a string cannot be parsed as an amount.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseAmountError {
    #[error("amount is empty")]
    Empty,

    #[error("invalid amount '{input}': {reason}")]
    Invalid { input: String, reason: String },
}

/// Normalizes input for decimal parsing: trims whitespace and removes commas (thousands separator).
fn normalize_decimal_input(s: &str) -> String {
    s.trim().replace(',', "")
}

/// Parses a string into a [`Decimal`].
///
/// Handles comma as thousands separator (e.g. `"1,234.56"`).
/// Empty or whitespace-only input is an error.
pub fn parse_decimal(s: &str) -> Result<Decimal, ParseAmountError> {
    let normalized = normalize_decimal_input(s);
    if normalized.is_empty() {
        return Err(ParseAmountError::Empty);
    }
    normalized.parse().map_err(|e: rust_decimal::Error| {
        tracing::debug!(input = %s, "invalid decimal: {}", e);
        ParseAmountError::Invalid {
            input: s.to_string(),
            reason: e.to_string(),
        }
    })
}

/// Parses a user-entered amount into the `f64` the calculator takes.
pub fn parse_amount(s: &str) -> Result<f64, ParseAmountError> {
    let value = parse_decimal(s)?;
    value.to_f64().ok_or_else(|| ParseAmountError::Invalid {
        input: s.to_string(),
        reason: "out of range".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn parse_decimal_accepts_comma_thousands_separator() {
        assert_eq!(parse_decimal("1,234.56").unwrap(), dec!(1234.56));
        assert_eq!(parse_decimal("1,234,567.89").unwrap(), dec!(1234567.89));
    }

    #[test]
    fn parse_decimal_trim_whitespace() {
        assert_eq!(parse_decimal("  123.45  ").unwrap(), dec!(123.45));
    }

    #[test]
    fn parse_decimal_empty_is_error() {
        assert_eq!(parse_decimal(""), Err(ParseAmountError::Empty));
        assert_eq!(parse_decimal("   "), Err(ParseAmountError::Empty));
    }

    #[test]
    fn parse_decimal_invalid_returns_error() {
        assert!(matches!(
            parse_decimal("abc"),
            Err(ParseAmountError::Invalid { input, .. }) if input == "abc"
        ));
    }

    #[test]
    fn parse_amount_converts_to_float() {
        assert_eq!(parse_amount("60,000").unwrap(), 60000.0);
        assert_eq!(parse_amount("-500").unwrap(), -500.0);
    }

    #[test]
    fn parse_amount_rejects_trailing_garbage() {
        assert!(parse_amount("60000abc").is_err());
    }
}
