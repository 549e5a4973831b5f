//! Bracket source backed by the remote tax-bracket service.
//!
//! The service exposes one endpoint per year:
//!
//! ```text
//! GET {base_url}/tax-calculator/tax-year/{year}
//! -> { "tax_brackets": [ { "min": 0, "max": 50197, "rate": 0.15 }, ... ] }
//! ```

pub mod client;
pub mod factory;

pub use client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, HttpBracketSource};
pub use factory::HttpSourceFactory;
