use std::path::Path;

use async_trait::async_trait;
use tax_core::{BracketSource, SourceConfig, SourceError, SourceFactory};

use crate::loader::CsvBracketSource;

/// [`SourceFactory`] for bracket files on disk, registered as `"csv"`.
///
/// `config.location` is the path to the CSV file. The whole file is read
/// once, when the source is created.
pub struct CsvSourceFactory;

#[async_trait]
impl SourceFactory for CsvSourceFactory {
    fn backend_name(&self) -> &'static str {
        "csv"
    }

    async fn create(
        &self,
        config: &SourceConfig,
    ) -> Result<Box<dyn BracketSource>, SourceError> {
        let path = Path::new(&config.location).to_path_buf();
        let source = tokio::task::spawn_blocking(move || CsvBracketSource::from_path(&path))
            .await
            .map_err(|e| SourceError::Unexpected(e.to_string()))?
            .map_err(|e| SourceError::Configuration(e.to_string()))?;
        Ok(Box::new(source))
    }
}
