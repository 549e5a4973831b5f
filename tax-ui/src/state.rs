//! Session state for the calculator.
//!
//! Mirrors what the form shows between submissions: whether a request is
//! in flight, the last error, and the last successful result.

use tax_core::TaxCalculation;

#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// A submission is waiting on brackets.
    pub loading: bool,

    /// User-facing message from the last failed submission.
    pub error: Option<String>,

    /// Result of the last successful submission.
    pub result: Option<TaxCalculation>,

    /// Year of the last submission that reached the bracket source.
    pub last_year: Option<i32>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the previous outcome and marks a request in flight.
    pub fn begin_submit(
        &mut self,
        tax_year: i32,
    ) {
        self.loading = true;
        self.error = None;
        self.result = None;
        self.last_year = Some(tax_year);
    }

    pub fn complete(
        &mut self,
        result: TaxCalculation,
    ) {
        self.loading = false;
        self.result = Some(result);
    }

    pub fn fail(
        &mut self,
        message: impl Into<String>,
    ) {
        self.loading = false;
        self.error = Some(message.into());
    }

    pub fn has_result(&self) -> bool {
        self.result.is_some()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn empty_result() -> TaxCalculation {
        TaxCalculation {
            total_tax: 0.0,
            effective_rate: 0.0,
            per_band: Vec::new(),
        }
    }

    #[test]
    fn begin_submit_clears_previous_outcome() {
        let mut state = AppState::new();
        state.fail("boom");
        state.complete(empty_result());

        state.begin_submit(2021);

        assert!(state.loading);
        assert_eq!(state.error, None);
        assert!(!state.has_result());
        assert_eq!(state.last_year, Some(2021));
    }

    #[test]
    fn complete_stores_result_and_stops_loading() {
        let mut state = AppState::new();
        state.begin_submit(2022);

        state.complete(empty_result());

        assert!(!state.loading);
        assert!(state.has_result());
    }

    #[test]
    fn fail_stores_message_and_stops_loading() {
        let mut state = AppState::new();
        state.begin_submit(2022);

        state.fail("API Error: Not Found");

        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some("API Error: Not Found"));
        assert!(!state.has_result());
    }
}
