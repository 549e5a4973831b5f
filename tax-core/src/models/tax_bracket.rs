use serde::{Deserialize, Serialize};

/// One progressive-rate band.
///
/// `min` is the lower bound of the band. `max` is the upper bound; `None`
/// marks the top band, which is unbounded above. `rate` is the marginal rate
/// as a fraction (`0.15` for 15%).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub min: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    pub rate: f64,
}

impl TaxBracket {
    /// A band with both bounds.
    pub fn bounded(
        min: f64,
        max: f64,
        rate: f64,
    ) -> Self {
        Self {
            min,
            max: Some(max),
            rate,
        }
    }

    /// The top band, open above `min`.
    pub fn unbounded(
        min: f64,
        rate: f64,
    ) -> Self {
        Self {
            min,
            max: None,
            rate,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.max.is_none()
    }
}

/// Body returned by the bracket service for a single tax year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxBracketResponse {
    pub tax_brackets: Vec<TaxBracket>,
}
