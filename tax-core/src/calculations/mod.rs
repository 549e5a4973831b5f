//! Progressive tax calculation over ordered rate bands.
//!
//! [`calculate_tax`] is the entry point. [`validate_brackets`] checks the
//! ordering and contiguity the calculator relies on but never enforces.

pub mod common;
pub mod progressive;
pub mod validation;

pub use progressive::{ProgressiveTax, calculate_tax};
pub use validation::{BracketSetError, validate_brackets};
