pub mod app;
pub mod config;
pub mod csv_loader;
pub mod form;
pub mod format;
pub mod logging;
pub mod session;
pub mod state;
pub mod utils;
pub mod views;

pub use app::{AppError, TaxApp, build_registry, build_source};
pub use config::TaxUiConfig;
pub use form::{FormError, TaxForm, TaxFormInput};
