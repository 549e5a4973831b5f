use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use tax_core::{BracketSource, SourceError, TaxBracket};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when loading tax bracket data.
#[derive(Debug, Error)]
pub enum TaxBracketLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("cannot read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<csv::Error> for TaxBracketLoaderError {
    fn from(err: csv::Error) -> Self {
        TaxBracketLoaderError::CsvParse(err.to_string())
    }
}

/// A single record from the tax brackets CSV file.
///
/// - `tax_year`: The tax year (e.g., 2022)
/// - `min`: Lower bound of the band
/// - `max`: Upper bound of the band (empty for the unbounded top band)
/// - `rate`: The marginal tax rate as a fraction (e.g., 0.15 for 15%)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TaxBracketRecord {
    pub tax_year: i32,
    pub min: f64,
    #[serde(deserialize_with = "deserialize_optional_f64")]
    pub max: Option<f64>,
    pub rate: f64,
}

impl From<&TaxBracketRecord> for TaxBracket {
    fn from(record: &TaxBracketRecord) -> Self {
        TaxBracket {
            min: record.min,
            max: record.max,
            rate: record.rate,
        }
    }
}

fn deserialize_optional_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Reads bracket records from CSV.
pub struct TaxBracketLoader;

impl TaxBracketLoader {
    /// Parse tax bracket records from a CSV reader.
    ///
    /// Headers are matched by name and whitespace around cells is trimmed.
    /// Records are returned in file order.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<TaxBracketRecord>, TaxBracketLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: TaxBracketRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Groups records by year. Bands within a year keep their file order.
    pub fn group(records: &[TaxBracketRecord]) -> BTreeMap<i32, Vec<TaxBracket>> {
        let mut groups: BTreeMap<i32, Vec<TaxBracket>> = BTreeMap::new();
        for record in records {
            groups
                .entry(record.tax_year)
                .or_default()
                .push(TaxBracket::from(record));
        }
        groups
    }
}

/// In-memory bracket sets loaded once from CSV.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsvBracketSource {
    by_year: BTreeMap<i32, Vec<TaxBracket>>,
}

impl CsvBracketSource {
    pub fn parse<R: Read>(reader: R) -> Result<Self, TaxBracketLoaderError> {
        let records = TaxBracketLoader::parse(reader)?;
        Ok(Self::from_records(&records))
    }

    pub fn from_records(records: &[TaxBracketRecord]) -> Self {
        Self {
            by_year: TaxBracketLoader::group(records),
        }
    }

    /// Read and parse the file at `path`.
    pub fn from_path(path: &Path) -> Result<Self, TaxBracketLoaderError> {
        let file = std::fs::File::open(path).map_err(|source| TaxBracketLoaderError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let source = Self::parse(file)?;
        debug!(path = %path.display(), years = ?source.years(), "loaded bracket file");
        Ok(source)
    }

    /// Years present in the file, ascending.
    pub fn years(&self) -> Vec<i32> {
        self.by_year.keys().copied().collect()
    }

    pub fn brackets_for(
        &self,
        tax_year: i32,
    ) -> Option<&[TaxBracket]> {
        self.by_year.get(&tax_year).map(Vec::as_slice)
    }
}

#[async_trait]
impl BracketSource for CsvBracketSource {
    async fn fetch_tax_brackets(
        &self,
        tax_year: i32,
    ) -> Result<Vec<TaxBracket>, SourceError> {
        self.brackets_for(tax_year)
            .map(<[TaxBracket]>::to_vec)
            .ok_or(SourceError::Unavailable(tax_year))
    }
}
