//! Bracket sets read from a local CSV file.

pub mod factory;
pub mod loader;

pub use factory::CsvSourceFactory;
pub use loader::{CsvBracketSource, TaxBracketLoader, TaxBracketLoaderError, TaxBracketRecord};
