//! Market data module
//!
//! Lists markets and reads token price histories from the Polymarket CLOB API,
//! and decides which markets are inside the collection window.

mod clob;
mod filter;
mod types;

pub use clob::{ClobClient, ClobConfig, CLOB_API_URL};
pub use filter::{parse_end_date, Eligibility, MarketFilter, RejectReason};
pub use types::{ApiError, ListingPage, Market, PricePoint, Token, END_CURSOR, END_DATE_FIELDS};

use async_trait::async_trait;

/// Cursor-paginated market listing
#[async_trait]
pub trait MarketListing: Send + Sync {
    /// Fetch the page starting at `cursor` (empty for the first page)
    async fn fetch_page(&self, cursor: &str) -> Result<ListingPage, ApiError>;
}

/// Per-token price history lookup
#[async_trait]
pub trait PriceHistorySource: Send + Sync {
    /// Full-range price history of one token, oldest first
    async fn fetch_history(&self, token_id: &str) -> Result<Vec<PricePoint>, ApiError>;
}
