//! Validation for the two-field calculator form.
//!
//! The calculator accepts any number; rejecting negative or non-numeric
//! income happens here, before it is ever called.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::utils::parse_amount;

static YEAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}$").expect("year pattern is a valid regex"));

/// Years offered when no configuration overrides them.
pub const DEFAULT_SUPPORTED_YEARS: [i32; 4] = [2019, 2020, 2021, 2022];

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("Income must be a non-negative number")]
    InvalidIncome,

    #[error("Tax year must be one of: {allowed}")]
    UnsupportedYear { allowed: String },
}

/// Raw field values as entered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaxForm {
    pub income: String,
    pub year: String,
}

/// Form values after validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaxFormInput {
    pub income: f64,
    pub tax_year: i32,
}

impl TaxForm {
    pub fn new(
        income: impl Into<String>,
        year: impl Into<String>,
    ) -> Self {
        Self {
            income: income.into(),
            year: year.into(),
        }
    }

    /// Checks both fields and reports every problem found.
    pub fn validate(
        &self,
        supported_years: &[i32],
    ) -> Result<TaxFormInput, Vec<FormError>> {
        let mut errors = Vec::new();

        let income = match parse_amount(&self.income) {
            Ok(v) if v >= 0.0 => Some(v),
            _ => {
                errors.push(FormError::InvalidIncome);
                None
            }
        };

        let tax_year = parse_year(&self.year, supported_years);
        if tax_year.is_none() {
            errors.push(FormError::UnsupportedYear {
                allowed: join_years(supported_years),
            });
        }

        match (income, tax_year) {
            (Some(income), Some(tax_year)) => Ok(TaxFormInput { income, tax_year }),
            _ => Err(errors),
        }
    }
}

fn parse_year(
    value: &str,
    supported_years: &[i32],
) -> Option<i32> {
    let value = value.trim();
    if !YEAR_PATTERN.is_match(value) {
        return None;
    }
    value
        .parse()
        .ok()
        .filter(|year| supported_years.contains(year))
}

fn join_years(years: &[i32]) -> String {
    years
        .iter()
        .map(i32::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// One message per line, in the order the fields appear.
pub fn format_form_errors(errors: &[FormError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
