//! Lazy walk over the cursor-paginated market listing

use crate::market::{ApiError, Market, MarketListing};
use futures_util::stream::{self, Stream};

/// Stream the markets of each listing page, starting from an empty cursor
///
/// Ends after a page whose cursor is absent, empty or the end sentinel, or
/// when a page carries no markets (that page is not yielded). A failed
/// request is yielded once and ends the stream.
pub fn market_pages<'a, L>(listing: &'a L) -> impl Stream<Item = Result<Vec<Market>, ApiError>> + 'a
where
    L: MarketListing + ?Sized,
{
    stream::try_unfold(Some(String::new()), move |cursor| async move {
        let Some(cursor) = cursor else {
            return Ok::<_, ApiError>(None);
        };

        let page = listing.fetch_page(&cursor).await?;
        if page.markets.is_empty() {
            tracing::info!(cursor = %cursor, "No more markets to fetch");
            return Ok(None);
        }

        let next = page.continuation().map(str::to_string);
        tracing::debug!(
            markets = page.markets.len(),
            next_cursor = ?next,
            "Fetched listing page"
        );
        Ok(Some((page.markets, next)))
    })
}
