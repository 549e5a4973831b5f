//! Selecting a [`BracketSource`] by name at runtime.
//!
//! Backend crates each provide a [`SourceFactory`]; the binary registers the
//! ones it links and picks one from configuration.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

use super::bracket_source::{BracketSource, SourceError};

/// Where brackets come from.
///
/// `location` means whatever the named backend needs: a base URL for
/// `"http"`, a file path for `"csv"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    pub backend: String,
    pub location: String,
    /// Per-fetch limit. Local backends ignore it.
    pub timeout: Duration,
}

impl SourceConfig {
    pub fn http(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            backend: "http".to_string(),
            location: base_url.into(),
            timeout,
        }
    }

    pub fn csv(path: &Path) -> Self {
        Self {
            backend: "csv".to_string(),
            location: path.display().to_string(),
            ..Self::default()
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self::http("http://localhost:5001", Duration::from_secs(5))
    }
}

#[async_trait]
pub trait SourceFactory: Send + Sync {
    /// Name matched against [`SourceConfig::backend`].
    fn backend_name(&self) -> &'static str;

    async fn create(
        &self,
        config: &SourceConfig,
    ) -> Result<Box<dyn BracketSource>, SourceError>;
}

/// Factories by backend name. Registering a name twice keeps the later one.
#[derive(Default)]
pub struct SourceRegistry {
    factories: HashMap<&'static str, Box<dyn SourceFactory>>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        factory: Box<dyn SourceFactory>,
    ) {
        self.factories.insert(factory.backend_name(), factory);
    }

    /// Sorted, for stable error messages.
    pub fn available_backends(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Builds the source named by `config.backend`.
    ///
    /// An unregistered name is a [`SourceError::Configuration`] listing the
    /// names that are registered.
    pub async fn create(
        &self,
        config: &SourceConfig,
    ) -> Result<Box<dyn BracketSource>, SourceError> {
        let Some(factory) = self.factories.get(config.backend.as_str()) else {
            return Err(SourceError::Configuration(format!(
                "unknown backend '{}'; available: {:?}",
                config.backend,
                self.available_backends()
            )));
        };
        factory.create(config).await
    }
}
