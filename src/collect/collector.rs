//! Collection pipeline
//!
//! Pages through the market listing, filters markets by end date and stores
//! the price history of every token not already on disk. Everything runs
//! sequentially: one page, one market, one token at a time.

use super::pages::market_pages;
use super::types::{CollectError, CollectStats};
use crate::config::HistoryErrorPolicy;
use crate::data::{HistoryRecord, HistoryStore, JsonHistoryStore, WriteOutcome};
use crate::market::{Eligibility, MarketFilter, MarketListing, PriceHistorySource, Token};
use crate::telemetry::{increment, CounterMetric};
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use std::path::Path;

/// Resumable history collector
pub struct Collector<L, H, S> {
    listing: L,
    history: H,
    store: S,
    filter: MarketFilter,
    on_history_error: HistoryErrorPolicy,
    stats: CollectStats,
}

impl<L, H, S> Collector<L, H, S>
where
    L: MarketListing,
    H: PriceHistorySource,
    S: HistoryStore,
{
    pub fn new(
        listing: L,
        history: H,
        store: S,
        filter: MarketFilter,
        on_history_error: HistoryErrorPolicy,
    ) -> Self {
        Self {
            listing,
            history,
            store,
            filter,
            on_history_error,
            stats: CollectStats::default(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Progress of the current or most recent run
    ///
    /// Stays readable when a run is dropped part-way, e.g. on interrupt.
    pub fn stats(&self) -> &CollectStats {
        &self.stats
    }

    /// Run one full pass over the listing, judging end dates against `now`
    ///
    /// Listing failures abort the run. Files written before an abort stay in
    /// place, so the next run picks up where this one stopped.
    pub async fn run(&mut self, now: DateTime<Utc>) -> Result<CollectStats, CollectError> {
        let Self {
            listing,
            history,
            store,
            filter,
            on_history_error,
            stats,
        } = self;
        *stats = CollectStats::default();

        tracing::info!(
            policy = ?filter.policy(),
            on_history_error = ?on_history_error,
            "Starting collection"
        );

        let pages = market_pages(&*listing);
        futures_util::pin_mut!(pages);

        while let Some(markets) = pages
            .try_next()
            .await
            .map_err(CollectError::UpstreamListing)?
        {
            stats.pages += 1;
            increment(CounterMetric::PagesFetched);

            for market in &markets {
                stats.markets_seen += 1;
                increment(CounterMetric::MarketsSeen);

                let end_date = match filter.evaluate(market, now) {
                    Eligibility::Eligible { end_date } => end_date,
                    Eligibility::Rejected(reason) => {
                        tracing::debug!(
                            slug = market.slug().unwrap_or_default(),
                            reason = reason.as_str(),
                            "Skipping market"
                        );
                        continue;
                    }
                };
                let Some(slug) = market.slug() else {
                    continue;
                };

                stats.markets_eligible += 1;
                increment(CounterMetric::MarketsEligible);
                tracing::info!(
                    slug,
                    end_date = %end_date,
                    tokens = market.tokens().len(),
                    "Collecting market"
                );

                for token in market.tokens() {
                    collect_token(
                        &*history,
                        &mut *store,
                        *on_history_error,
                        slug,
                        token,
                        stats,
                    )
                    .await?;
                }
            }
        }

        tracing::info!(
            pages = stats.pages,
            files_written = stats.files_written,
            failed = stats.tokens_failed(),
            "Collection finished"
        );
        Ok(stats.clone())
    }
}

impl<L, H> Collector<L, H, JsonHistoryStore>
where
    L: MarketListing,
    H: PriceHistorySource,
{
    /// Collector writing into `output_dir`, which is created and scanned here
    pub fn open(
        listing: L,
        history: H,
        output_dir: &Path,
        filter: MarketFilter,
        on_history_error: HistoryErrorPolicy,
    ) -> Result<Self, CollectError> {
        let store = JsonHistoryStore::open(output_dir)?;
        Ok(Self::new(listing, history, store, filter, on_history_error))
    }
}

/// Fetch and store a single token unless it is already on disk
async fn collect_token<H, S>(
    history: &H,
    store: &mut S,
    on_history_error: HistoryErrorPolicy,
    slug: &str,
    token: &Token,
    stats: &mut CollectStats,
) -> Result<(), CollectError>
where
    H: PriceHistorySource + ?Sized,
    S: HistoryStore + ?Sized,
{
    let Some(token_id) = token.id() else {
        tracing::debug!(slug, "Skipping token without id");
        return Ok(());
    };

    if store.exists(slug, token_id) {
        stats.tokens_skipped_existing += 1;
        increment(CounterMetric::TokensSkippedExisting);
        tracing::debug!(slug, token_id, "History already stored");
        return Ok(());
    }

    tracing::info!(slug, token_id, "Fetching prices");
    let points = match history.fetch_history(token_id).await {
        Ok(points) => points,
        Err(source) => {
            stats.history_failures += 1;
            increment(CounterMetric::HistoryFailures);

            if on_history_error == HistoryErrorPolicy::Abort {
                return Err(CollectError::UpstreamHistory {
                    token_id: token_id.to_string(),
                    source,
                });
            }
            tracing::warn!(slug, token_id, error = %source, "Price history failed, skipping token");
            stats.failures.push((token_id.to_string(), source.to_string()));
            return Ok(());
        }
    };

    let record = HistoryRecord::new(points, token.outcome.clone());
    match store.write(slug, token_id, &record) {
        Ok(WriteOutcome::Written(path)) => {
            stats.files_written += 1;
            increment(CounterMetric::FilesWritten);
            tracing::info!(
                slug,
                token_id,
                points = record.history.len(),
                path = ?path,
                "Saved price history"
            );
        }
        Ok(WriteOutcome::EmptyHistory) => {
            stats.empty_histories += 1;
            increment(CounterMetric::TokensEmpty);
            tracing::info!(slug, token_id, "Empty price history, nothing saved");
        }
        Err(e) => {
            stats.write_failures += 1;
            increment(CounterMetric::WriteFailures);
            tracing::error!(slug, token_id, error = %e, "Failed to save price history");
            stats.failures.push((token_id.to_string(), e.to_string()));
        }
    }

    Ok(())
}
