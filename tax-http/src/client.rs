use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tax_core::{BracketSource, SourceError, TaxBracket, TaxBracketResponse};
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "http://localhost:5001";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Fetches bracket sets over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBracketSource {
    client: Client,
    base_url: String,
}

impl HttpBracketSource {
    /// Builds a source for `base_url` with a per-request `timeout`.
    ///
    /// # Errors
    /// [`SourceError::Configuration`] when `base_url` is not an absolute
    /// http(s) URL or the HTTP client cannot be built.
    pub fn new(
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, SourceError> {
        let base_url = base_url.trim_end_matches('/');
        let parsed = Url::parse(base_url).map_err(|e| {
            SourceError::Configuration(format!("invalid base URL '{base_url}': {e}"))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(SourceError::Configuration(format!(
                "base URL '{base_url}' must use http or https"
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SourceError::Configuration(format!("cannot build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    /// Source for the default local service address.
    pub fn with_defaults() -> Result<Self, SourceError> {
        Self::new(DEFAULT_BASE_URL, DEFAULT_TIMEOUT)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the bracket endpoint for `tax_year`.
    pub fn year_url(
        &self,
        tax_year: i32,
    ) -> String {
        format!("{}/tax-calculator/tax-year/{tax_year}", self.base_url)
    }
}

#[async_trait]
impl BracketSource for HttpBracketSource {
    async fn fetch_tax_brackets(
        &self,
        tax_year: i32,
    ) -> Result<Vec<TaxBracket>, SourceError> {
        let url = self.year_url(tax_year);
        debug!(%url, "fetching tax brackets");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(translate_error)?;

        let status = response.status();
        if !status.is_success() {
            warn!(%url, %status, "bracket service returned an error status");
            return Err(SourceError::Api(status_text(status)));
        }

        let body: TaxBracketResponse = response.json().await.map_err(translate_error)?;
        debug!(tax_year, bands = body.tax_brackets.len(), "received tax brackets");
        Ok(body.tax_brackets)
    }
}

/// Reason phrase for `status`, falling back to the bare code.
fn status_text(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.as_str().to_string())
}

/// Maps transport failures onto the three user-facing categories:
/// no response at all, a body that could not be read, or anything else.
fn translate_error(error: reqwest::Error) -> SourceError {
    if error.is_timeout() || error.is_connect() || error.is_request() {
        warn!(%error, "no response from bracket service");
        SourceError::NoResponse
    } else {
        warn!(%error, "bracket request failed");
        SourceError::Unexpected(error.to_string())
    }
}
