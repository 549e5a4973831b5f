pub mod calculations;
pub mod models;
pub mod source;

pub use calculations::{BracketSetError, ProgressiveTax, calculate_tax, validate_brackets};
pub use models::*;
pub use source::{
    BracketSource, CachedBracketSource, SourceConfig, SourceError, SourceFactory, SourceRegistry,
};
