//! The calculator session: form in, result or error message out.

use tax_core::{
    BracketSetError, BracketSource, CachedBracketSource, SourceConfig, SourceError,
    SourceRegistry, TaxCalculation, calculate_tax, validate_brackets,
};
use tax_data::CsvSourceFactory;
use tax_http::HttpSourceFactory;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::form::{FormError, TaxForm, TaxFormInput, format_form_errors};
use crate::state::AppState;
use crate::views::render_error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{}", format_form_errors(.0))]
    Form(Vec<FormError>),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("Tax brackets for {year} are invalid: {source}")]
    MalformedBrackets {
        year: i32,
        #[source]
        source: BracketSetError,
    },
}

/// Every backend the binary can talk to.
pub fn build_registry() -> SourceRegistry {
    let mut registry = SourceRegistry::new();
    registry.register(Box::new(HttpSourceFactory));
    registry.register(Box::new(CsvSourceFactory));
    registry
}

/// Resolves `config` through [`build_registry`].
pub async fn build_source(config: &SourceConfig) -> Result<Box<dyn BracketSource>, SourceError> {
    info!(backend = %config.backend, location = %config.location, "creating bracket source");
    build_registry().create(config).await
}

pub struct TaxApp {
    source: CachedBracketSource<Box<dyn BracketSource>>,
    supported_years: Vec<i32>,
    state: AppState,
}

impl TaxApp {
    pub fn new(
        source: Box<dyn BracketSource>,
        supported_years: Vec<i32>,
    ) -> Self {
        Self {
            source: CachedBracketSource::new(source),
            supported_years,
            state: AppState::new(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn supported_years(&self) -> &[i32] {
        &self.supported_years
    }

    /// Years whose brackets have already been fetched.
    pub fn cached_years(&self) -> Vec<i32> {
        self.source.cached_years()
    }

    /// Forgets cached brackets for `tax_year`, or for every year.
    pub fn refresh(
        &self,
        tax_year: Option<i32>,
    ) {
        match tax_year {
            Some(year) => self.source.invalidate(year),
            None => self.source.clear(),
        }
        info!(?tax_year, "bracket cache refreshed");
    }

    /// Validates `form`, then runs a calculation and records the outcome.
    ///
    /// Form errors leave the previous outcome in place. Any later failure
    /// replaces it with a message in [`AppState::error`].
    pub async fn submit(
        &mut self,
        form: &TaxForm,
    ) -> Result<TaxCalculation, AppError> {
        let input = form
            .validate(&self.supported_years)
            .map_err(AppError::Form)?;

        self.state.begin_submit(input.tax_year);
        match self.calculate(input).await {
            Ok(result) => {
                self.state.complete(result.clone());
                Ok(result)
            }
            Err(error) => {
                warn!(tax_year = input.tax_year, %error, "calculation failed");
                self.state.fail(render_error(&error.to_string()));
                Err(error)
            }
        }
    }

    /// Fetches brackets for an already validated input and applies them.
    pub async fn calculate(
        &self,
        input: TaxFormInput,
    ) -> Result<TaxCalculation, AppError> {
        let brackets = self.source.fetch_tax_brackets(input.tax_year).await?;
        if brackets.is_empty() {
            return Err(SourceError::Unavailable(input.tax_year).into());
        }
        validate_brackets(&brackets).map_err(|source| AppError::MalformedBrackets {
            year: input.tax_year,
            source,
        })?;

        let result = calculate_tax(input.income, &brackets);
        debug!(
            tax_year = input.tax_year,
            total_tax = result.total_tax,
            bands = result.per_band.len(),
            "calculated"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use tax_core::TaxBracket;

    use super::*;
    use crate::form::DEFAULT_SUPPORTED_YEARS;

    // ── stub sources ──

    struct FixedSource {
        brackets: Vec<TaxBracket>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl BracketSource for FixedSource {
        async fn fetch_tax_brackets(
            &self,
            _tax_year: i32,
        ) -> Result<Vec<TaxBracket>, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.brackets.clone())
        }
    }

    struct FailingSource(SourceError);

    #[async_trait]
    impl BracketSource for FailingSource {
        async fn fetch_tax_brackets(
            &self,
            _tax_year: i32,
        ) -> Result<Vec<TaxBracket>, SourceError> {
            Err(self.0.clone())
        }
    }

    fn two_bands() -> Vec<TaxBracket> {
        vec![
            TaxBracket::bounded(0.0, 10_000.0, 0.1),
            TaxBracket::unbounded(10_000.0, 0.2),
        ]
    }

    fn app_with(brackets: Vec<TaxBracket>) -> (TaxApp, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = FixedSource {
            brackets,
            calls: calls.clone(),
        };
        let app = TaxApp::new(Box::new(source), DEFAULT_SUPPORTED_YEARS.to_vec());
        (app, calls)
    }

    // ── submit ──

    #[tokio::test]
    async fn submit_stores_result() {
        let (mut app, _) = app_with(two_bands());

        let result = app.submit(&TaxForm::new("15000", "2022")).await.unwrap();

        assert_eq!(result.total_tax, 2_000.0);
        assert_eq!(result.per_band.len(), 2);
        assert!(!app.state().loading);
        assert_eq!(app.state().error, None);
        assert_eq!(app.state().result, Some(result));
        assert_eq!(app.state().last_year, Some(2022));
    }

    #[tokio::test]
    async fn zero_income_has_no_finite_rate() {
        let (mut app, _) = app_with(two_bands());

        let result = app.submit(&TaxForm::new("0", "2022")).await.unwrap();

        assert_eq!(result.total_tax, 0.0);
        assert!(result.per_band.is_empty());
        assert!(result.effective_rate.is_nan());
    }

    #[tokio::test]
    async fn form_errors_skip_the_source() {
        let (mut app, calls) = app_with(two_bands());

        let err = app.submit(&TaxForm::new("-5", "1999")).await.unwrap_err();

        match err {
            AppError::Form(errors) => assert_eq!(errors.len(), 2),
            other => panic!("expected form errors, got {other:?}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(app.state().last_year, None);
    }

    #[tokio::test]
    async fn repeated_year_is_fetched_once() {
        let (mut app, calls) = app_with(two_bands());

        app.submit(&TaxForm::new("15000", "2022")).await.unwrap();
        app.submit(&TaxForm::new("30000", "2022")).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(app.cached_years(), vec![2022]);
    }

    #[tokio::test]
    async fn source_failure_sets_error_message() {
        let source = FailingSource(SourceError::Api("Not Found".to_string()));
        let mut app = TaxApp::new(Box::new(source), DEFAULT_SUPPORTED_YEARS.to_vec());

        let err = app.submit(&TaxForm::new("15000", "2022")).await.unwrap_err();

        assert!(matches!(err, AppError::Source(SourceError::Api(_))));
        assert_eq!(
            app.state().error.as_deref(),
            Some("API Error: Not Found Please try again.")
        );
        assert!(!app.state().loading);
        assert!(!app.state().has_result());
    }

    #[tokio::test]
    async fn failure_clears_previous_result() {
        let (mut app, _) = app_with(two_bands());
        app.submit(&TaxForm::new("15000", "2022")).await.unwrap();

        let (mut broken, _) = app_with(Vec::new());
        broken.state = app.state().clone();
        broken.submit(&TaxForm::new("15000", "2021")).await.unwrap_err();

        assert!(!broken.state().has_result());
        assert_eq!(broken.state().last_year, Some(2021));
    }

    #[tokio::test]
    async fn empty_bracket_list_is_unavailable() {
        let (mut app, _) = app_with(Vec::new());

        let err = app.submit(&TaxForm::new("15000", "2020")).await.unwrap_err();

        assert!(matches!(err, AppError::Source(SourceError::Unavailable(2020))));
        assert_eq!(
            app.state().error.as_deref(),
            Some("Tax brackets are not available for 2020 Please try again.")
        );
    }

    #[tokio::test]
    async fn malformed_brackets_are_rejected() {
        let (app, _) = app_with(vec![
            TaxBracket::bounded(0.0, 10_000.0, 0.1),
            TaxBracket::unbounded(12_000.0, 0.2),
        ]);
        let input = TaxFormInput {
            income: 50_000.0,
            tax_year: 2022,
        };

        let err = app.calculate(input).await.unwrap_err();

        assert!(matches!(
            err,
            AppError::MalformedBrackets {
                year: 2022,
                source: BracketSetError::NotContiguous { index: 1, .. }
            }
        ));
    }

    #[tokio::test]
    async fn refresh_refetches_brackets() {
        let (mut app, calls) = app_with(two_bands());
        app.submit(&TaxForm::new("15000", "2022")).await.unwrap();
        app.submit(&TaxForm::new("15000", "2021")).await.unwrap();

        app.refresh(Some(2022));
        assert_eq!(app.cached_years(), vec![2021]);

        app.submit(&TaxForm::new("15000", "2022")).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        app.refresh(None);
        assert!(app.cached_years().is_empty());
    }

    // ── registry ──

    #[test]
    fn registry_knows_both_backends() {
        assert_eq!(build_registry().available_backends(), vec!["csv", "http"]);
    }

    #[tokio::test]
    async fn unknown_backend_is_configuration_error() {
        let config = SourceConfig {
            backend: "ftp".to_string(),
            ..SourceConfig::default()
        };

        let result = build_source(&config).await;

        assert!(matches!(result, Err(SourceError::Configuration(_))));
    }
}
