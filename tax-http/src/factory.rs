use async_trait::async_trait;
use tax_core::{BracketSource, SourceConfig, SourceError, SourceFactory};

use crate::client::HttpBracketSource;

/// [`SourceFactory`] for the remote bracket service.
///
/// Register this with a [`tax_core::SourceRegistry`] to make the `"http"`
/// backend available:
///
/// ```rust
/// use tax_core::SourceRegistry;
/// use tax_http::HttpSourceFactory;
///
/// let mut registry = SourceRegistry::new();
/// registry.register(Box::new(HttpSourceFactory));
/// assert_eq!(registry.available_backends(), vec!["http"]);
/// ```
pub struct HttpSourceFactory;

#[async_trait]
impl SourceFactory for HttpSourceFactory {
    fn backend_name(&self) -> &'static str {
        "http"
    }

    /// `config.location` is the service base URL; `config.timeout` bounds
    /// each request.
    async fn create(
        &self,
        config: &SourceConfig,
    ) -> Result<Box<dyn BracketSource>, SourceError> {
        let source = HttpBracketSource::new(&config.location, config.timeout)?;
        Ok(Box::new(source))
    }
}
