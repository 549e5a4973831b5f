//! Progressive (marginal-rate) tax over an ordered set of bands.
//!
//! Each band taxes only the slice of income that falls inside it:
//!
//! | Band           | Taxable slice                      |
//! |----------------|------------------------------------|
//! | `income <= min`| nothing, band is skipped           |
//! | bounded        | `min(income, max) - min`           |
//! | unbounded      | `income - min`                     |
//!
//! The scan is a single pass in input order. It is only correct when the
//! bands are sorted ascending by `min`, non-overlapping and contiguous, with
//! at most one unbounded band at the end. Nothing here sorts or repairs the
//! input; see [`validate_brackets`](super::validate_brackets).
//!
//! # Example
//!
//! ```
//! use tax_core::{TaxBracket, calculate_tax};
//!
//! let brackets = vec![
//!     TaxBracket::bounded(0.0, 50000.0, 0.1),
//!     TaxBracket::unbounded(50000.0, 0.2),
//! ];
//!
//! let result = calculate_tax(60000.0, &brackets);
//!
//! assert!((result.total_tax - 7000.0).abs() < 1e-9);
//! assert_eq!(result.per_band.len(), 2);
//! ```

use tracing::warn;

use super::validation::validate_brackets;
use crate::{BandTax, TaxBracket, TaxCalculation};

/// Calculator bound to one bracket set.
#[derive(Debug, Clone)]
pub struct ProgressiveTax<'a> {
    brackets: &'a [TaxBracket],
}

impl<'a> ProgressiveTax<'a> {
    /// Binds the calculator to `brackets`.
    ///
    /// Debug builds log a warning when the set is not sorted and contiguous.
    /// The set is used as given either way.
    pub fn new(brackets: &'a [TaxBracket]) -> Self {
        if cfg!(debug_assertions) {
            if let Err(error) = validate_brackets(brackets) {
                warn!(%error, "bracket set breaks the ordering the calculator assumes");
            }
        }
        Self { brackets }
    }

    /// Computes total tax, effective rate and the per-band breakdown.
    ///
    /// Total over its input: negative or non-finite income propagates into
    /// the result, and zero income gives a NaN effective rate.
    pub fn calculate(
        &self,
        income: f64,
    ) -> TaxCalculation {
        let mut total_tax = 0.0;
        let mut per_band = Vec::new();

        for bracket in self.brackets {
            // Strict comparison: a band starting exactly at `income` is skipped,
            // and so is every band when income is NaN.
            if income > bracket.min {
                let tax = taxable_in_band(income, bracket) * bracket.rate;
                total_tax += tax;
                per_band.push(BandTax {
                    bracket: *bracket,
                    tax,
                });
            }
        }

        TaxCalculation {
            total_tax,
            effective_rate: total_tax / income,
            per_band,
        }
    }
}

/// Computes the tax owed on `income` under `brackets`.
///
/// Shorthand for `ProgressiveTax::new(brackets).calculate(income)`.
pub fn calculate_tax(
    income: f64,
    brackets: &[TaxBracket],
) -> TaxCalculation {
    ProgressiveTax::new(brackets).calculate(income)
}

fn taxable_in_band(
    income: f64,
    bracket: &TaxBracket,
) -> f64 {
    match bracket.max {
        Some(max) => income.min(max) - bracket.min,
        None => income - bracket.min,
    }
}
