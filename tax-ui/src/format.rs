//! Display formatting for amounts and rates.
//!
//! Currency follows the `en-CA` CAD style: `$1,234.56`, `-$1,234.56`.
//! Anything non-finite (NaN effective rate at zero income, for instance)
//! renders as [`NOT_AVAILABLE`] rather than leaking `NaN` into the output.

use num_format::{Locale, ToFormattedString};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use tax_core::BandTax;
use tax_core::calculations::common::to_money;

pub const NOT_AVAILABLE: &str = "N/A";
pub const UNBOUNDED: &str = "∞";

/// Formats `amount` as dollars and cents.
pub fn format_currency(amount: f64) -> String {
    to_money(amount)
        .and_then(format_money)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Formats a fractional `rate` as a percentage with two decimals.
pub fn format_percent(rate: f64) -> String {
    match to_money(rate * 100.0) {
        Some(value) => format!("{}%", two_places(value)),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// `<min> - <max> @ <rate>: <tax>`, with `∞` for the top band.
pub fn format_band(band: &BandTax) -> String {
    let upper = match band.bracket.max {
        Some(max) => format_currency(max),
        None => UNBOUNDED.to_string(),
    };
    format!(
        "{} - {} @ {}: {}",
        format_currency(band.bracket.min),
        upper,
        format_percent(band.bracket.rate),
        format_currency(band.tax)
    )
}

fn format_money(value: Decimal) -> Option<String> {
    let sign = if value.is_sign_negative() && !value.is_zero() {
        "-"
    } else {
        ""
    };
    let value = value.abs();
    let whole = value.trunc().to_i128()?;
    let cents = (value.fract() * Decimal::ONE_HUNDRED).to_u32()?;
    Some(format!(
        "{sign}${}.{cents:02}",
        whole.to_formatted_string(&Locale::en)
    ))
}

fn two_places(mut value: Decimal) -> String {
    value.rescale(2);
    value.to_string()
}
