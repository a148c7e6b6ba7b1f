//! Collection errors and run statistics

use crate::data::StoreError;
use crate::market::ApiError;
use std::fmt;
use thiserror::Error;

/// Errors that end a collection run
#[derive(Debug, Error)]
pub enum CollectError {
    /// The market listing could not be fetched or decoded
    #[error("Market listing failed: {0}")]
    UpstreamListing(#[source] ApiError),
    /// A price history request failed while failures are fatal
    #[error("Price history failed for token {token_id}: {source}")]
    UpstreamHistory {
        token_id: String,
        #[source]
        source: ApiError,
    },
    /// The output directory could not be used
    #[error("Filesystem error: {0}")]
    Filesystem(#[from] StoreError),
}

/// Statistics from a collection run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CollectStats {
    pub pages: usize,
    pub markets_seen: usize,
    pub markets_eligible: usize,
    pub tokens_skipped_existing: usize,
    pub empty_histories: usize,
    pub files_written: usize,
    pub history_failures: usize,
    pub write_failures: usize,
    /// (token id, error) for every token that failed
    pub failures: Vec<(String, String)>,
}

impl CollectStats {
    /// Tokens that hit an error and will be retried by the next run
    pub fn tokens_failed(&self) -> usize {
        self.history_failures + self.write_failures
    }
}

impl fmt::Display for CollectStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Collection Statistics:")?;
        writeln!(f, "  Pages fetched: {}", self.pages)?;
        writeln!(
            f,
            "  Markets eligible: {} of {}",
            self.markets_eligible, self.markets_seen
        )?;
        writeln!(f, "  Files written: {}", self.files_written)?;
        writeln!(f, "  Already stored: {}", self.tokens_skipped_existing)?;
        writeln!(f, "  Empty histories: {}", self.empty_histories)?;
        writeln!(f, "  Tokens failed: {}", self.tokens_failed())?;
        if !self.failures.is_empty() {
            writeln!(f, "  Errors:")?;
            for (token, err) in &self.failures {
                writeln!(f, "    {}: {}", token, err)?;
            }
        }
        Ok(())
    }
}
