//! Rounding helpers shared by everything that displays money.
//!
//! Calculations run in `f64`; amounts are converted to [`Decimal`] and
//! rounded only when they leave the calculator for display.

use rust_decimal::Decimal;

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// This follows standard financial rounding conventions where values at exactly
/// 0.005 are rounded up to 0.01 (away from zero).
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Converts a calculated amount to a two-decimal [`Decimal`].
///
/// Returns `None` for NaN and infinities, and for magnitudes a `Decimal`
/// cannot hold.
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::to_money;
///
/// assert_eq!(to_money(7000.0), Some(dec!(7000.00)));
/// assert_eq!(to_money(f64::NAN), None);
/// ```
pub fn to_money(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_f64_retain(value).map(round_half_up)
}
