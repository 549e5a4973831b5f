use async_trait::async_trait;
use thiserror::Error;

use crate::models::TaxBracket;

/// Failures surfaced while retrieving brackets.
///
/// The `Display` text is shown to the user as is.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceError {
    /// The service answered with a non-success status.
    #[error("API Error: {0}")]
    Api(String),

    /// The request went out but nothing came back (refused, timed out).
    #[error("API Error: No response received.")]
    NoResponse,

    #[error("Unexpected Error: {0}")]
    Unexpected(String),

    #[error("Tax brackets are not available for {0}")]
    Unavailable(i32),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Supplies the ordered bracket set for a tax year.
#[async_trait]
pub trait BracketSource: Send + Sync {
    async fn fetch_tax_brackets(
        &self,
        tax_year: i32,
    ) -> Result<Vec<TaxBracket>, SourceError>;
}

#[async_trait]
impl<T: BracketSource + ?Sized> BracketSource for Box<T> {
    async fn fetch_tax_brackets(
        &self,
        tax_year: i32,
    ) -> Result<Vec<TaxBracket>, SourceError> {
        (**self).fetch_tax_brackets(tax_year).await
    }
}
