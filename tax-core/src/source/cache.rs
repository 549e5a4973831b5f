use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tracing::debug;

use super::bracket_source::{BracketSource, SourceError};
use crate::models::TaxBracket;

/// Per-year cache in front of another [`BracketSource`].
///
/// A year is fetched from the inner source at most once while it stays
/// cached. Failed fetches are not cached, so the next request retries.
pub struct CachedBracketSource<S> {
    inner: S,
    entries: Mutex<HashMap<i32, Vec<TaxBracket>>>,
}

impl<S: BracketSource> CachedBracketSource<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Years currently held, sorted ascending.
    pub fn cached_years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.entries().keys().copied().collect();
        years.sort_unstable();
        years
    }

    /// Drops one year so the next request goes to the inner source.
    pub fn invalidate(
        &self,
        tax_year: i32,
    ) {
        self.entries().remove(&tax_year);
    }

    pub fn clear(&self) {
        self.entries().clear();
    }

    // The map is only ever replaced wholesale per key, so a poisoned lock
    // still holds consistent data.
    fn entries(&self) -> MutexGuard<'_, HashMap<i32, Vec<TaxBracket>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl<S: BracketSource> BracketSource for CachedBracketSource<S> {
    async fn fetch_tax_brackets(
        &self,
        tax_year: i32,
    ) -> Result<Vec<TaxBracket>, SourceError> {
        let cached = self.entries().get(&tax_year).cloned();
        if let Some(brackets) = cached {
            debug!(tax_year, "bracket cache hit");
            return Ok(brackets);
        }

        debug!(tax_year, "bracket cache miss");
        let brackets = self.inner.fetch_tax_brackets(tax_year).await?;
        self.entries().insert(tax_year, brackets.clone());
        Ok(brackets)
    }
}
