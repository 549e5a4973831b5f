pub mod bracket_source;
pub mod cache;
pub mod factory;

pub use bracket_source::{BracketSource, SourceError};
pub use cache::CachedBracketSource;
pub use factory::{SourceConfig, SourceFactory, SourceRegistry};
