use thiserror::Error;

use crate::TaxBracket;

/// Ways a bracket set can break the ordering the calculator relies on.
///
/// Every variant carries the zero-based index of the offending band.
#[derive(Debug, Error, PartialEq)]
pub enum BracketSetError {
    #[error("band {index} has a non-finite bound or rate")]
    NonFinite { index: usize },

    #[error("band {index} has rate {rate}, expected a fraction between 0 and 1")]
    RateOutOfRange { index: usize, rate: f64 },

    #[error("band {index} is empty or inverted ({min} to {max})")]
    EmptyBand { index: usize, min: f64, max: f64 },

    #[error("band {index} is unbounded but is not the last band")]
    UnboundedBeforeEnd { index: usize },

    #[error("band {index} starts at {found}, expected {expected}")]
    NotContiguous {
        index: usize,
        expected: f64,
        found: f64,
    },
}

/// Checks that `brackets` are sorted, contiguous and well formed.
///
/// An empty set is accepted. The first band may start anywhere; every later
/// band must start exactly where the previous one ends, which rules out both
/// gaps and overlaps. Only the last band may be unbounded.
pub fn validate_brackets(brackets: &[TaxBracket]) -> Result<(), BracketSetError> {
    let last = brackets.len().saturating_sub(1);
    let mut previous_max: Option<f64> = None;

    for (index, bracket) in brackets.iter().enumerate() {
        let bounds_finite =
            bracket.min.is_finite() && bracket.max.is_none_or(|max| max.is_finite());
        if !bounds_finite || !bracket.rate.is_finite() {
            return Err(BracketSetError::NonFinite { index });
        }

        if !(0.0..=1.0).contains(&bracket.rate) {
            return Err(BracketSetError::RateOutOfRange {
                index,
                rate: bracket.rate,
            });
        }

        if let Some(expected) = previous_max {
            if bracket.min != expected {
                return Err(BracketSetError::NotContiguous {
                    index,
                    expected,
                    found: bracket.min,
                });
            }
        }

        match bracket.max {
            Some(max) if max <= bracket.min => {
                return Err(BracketSetError::EmptyBand {
                    index,
                    min: bracket.min,
                    max,
                });
            }
            Some(max) => previous_max = Some(max),
            None if index != last => {
                return Err(BracketSetError::UnboundedBeforeEnd { index });
            }
            None => {}
        }
    }

    Ok(())
}
