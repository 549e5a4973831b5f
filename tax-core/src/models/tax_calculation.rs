use serde::{Deserialize, Serialize};

use super::TaxBracket;

/// Tax attributed to a single band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandTax {
    pub bracket: TaxBracket,
    pub tax: f64,
}

/// Result of a progressive tax calculation.
///
/// `effective_rate` is `total_tax / income` with no special casing, so it is
/// NaN when income is zero. Callers decide how to display non-finite rates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxCalculation {
    pub total_tax: f64,
    pub effective_rate: f64,

    /// One entry per band that taxed a non-zero slice, in input order.
    pub per_band: Vec<BandTax>,
}

impl TaxCalculation {
    /// Whether `effective_rate` can be shown as a number.
    pub fn has_finite_rate(&self) -> bool {
        self.effective_rate.is_finite()
    }
}
