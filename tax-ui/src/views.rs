//! Plain-text rendering of calculation results and failures.

use tax_core::TaxCalculation;

use crate::form::{FormError, format_form_errors};
use crate::format::{format_band, format_currency, format_percent};

/// Renders totals followed by one line per contributing band.
pub fn render_result(result: &TaxCalculation) -> String {
    let mut out = format!(
        "Total Tax: {}\nEffective Rate: {}\nPer Band:",
        format_currency(result.total_tax),
        format_percent(result.effective_rate)
    );
    if result.per_band.is_empty() {
        out.push_str("\n  (none)");
    }
    for band in &result.per_band {
        out.push_str("\n  - ");
        out.push_str(&format_band(band));
    }
    out
}

/// Failure text shown after a submit that could not produce a result.
pub fn render_error(message: &str) -> String {
    format!("{message} Please try again.")
}

pub fn render_form_errors(errors: &[FormError]) -> String {
    format_form_errors(errors)
}
