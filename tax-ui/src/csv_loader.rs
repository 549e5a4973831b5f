//! CSV loader for batch calculator input.
//!
//! ## CSV Format
//!
//! Headers are matched by name, so column order does not matter. Extra
//! columns are ignored.
//!
//! | Column     | Required | Notes                                        |
//! |------------|----------|----------------------------------------------|
//! | `income`   | yes      | non-negative; `75,000.50` and `75000.5` both parse |
//! | `tax_year` | yes      | four digits, must be a supported year        |
//!
//! ```csv
//! income,tax_year
//! 50000,2022
//! "120,000.00",2021
//! ```
//!
//! Every row goes through the same checks as the interactive form.
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::form::{FormError, TaxForm, TaxFormInput, format_form_errors};

// ---------------------------------------------------------------------------
// Serde-compatible row; values stay as text until the form validates them
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CsvRow {
    income: String,
    tax_year: String,
}

// ---------------------------------------------------------------------------
// Public error type
// ---------------------------------------------------------------------------

/// Errors that can occur while loading batch input.
#[derive(Debug, thiserror::Error)]
pub enum CsvLoadError {
    /// Bad structure or a missing required column.
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// A row failed form validation. `row` is 1-based, header excluded.
    #[error("row {row}: {}", format_form_errors(.errors))]
    InvalidRow { row: usize, errors: Vec<FormError> },

    #[error("cannot read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Core loader
// ---------------------------------------------------------------------------

/// Parse CSV text and return validated inputs in file order.
///
/// Stops at the first invalid row.
pub fn load_from_str(
    input: &str,
    supported_years: &[i32],
) -> Result<Vec<TaxFormInput>, CsvLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| {
            let row = result?;
            TaxForm::new(row.income, row.tax_year)
                .validate(supported_years)
                .map_err(|errors| CsvLoadError::InvalidRow {
                    row: idx + 1,
                    errors,
                })
        })
        .collect()
}

/// Reads `path` and delegates to [load_from_str].
pub fn load_from_file(
    path: &Path,
    supported_years: &[i32],
) -> Result<Vec<TaxFormInput>, CsvLoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CsvLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_from_str(&contents, supported_years)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
