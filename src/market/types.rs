//! Upstream CLOB data model

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Cursor value the listing endpoint returns on its last page
pub const END_CURSOR: &str = "LTE=";

/// End-date fields in the order they are consulted
pub const END_DATE_FIELDS: [&str; 4] = ["end_date_iso", "end_date", "resolved_at", "close_time"];

/// Errors talking to the CLOB API
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure or timeout
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Non-2xx response
    #[error("API returned {status}: {body}")]
    Status { status: u16, body: String },
    /// Body was not the JSON we expected
    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// One outcome token of a market
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Token {
    #[serde(default, deserialize_with = "lenient_string")]
    pub token_id: Option<String>,
    /// Outcome label, e.g. "Yes" / "No"
    #[serde(default, deserialize_with = "lenient_string")]
    pub outcome: Option<String>,
}

/// Accept strings and numbers; anything else reads as absent
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

impl Token {
    /// Token identifier with surrounding whitespace removed, if non-empty
    pub fn id(&self) -> Option<&str> {
        self.token_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

/// A market record from the `/markets` listing
///
/// Every field is optional; the filter decides what a usable market needs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Market {
    #[serde(default)]
    pub market_slug: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub end_date_iso: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub resolved_at: Option<String>,
    #[serde(default)]
    pub close_time: Option<String>,
    #[serde(default)]
    pub tokens: Option<Vec<Token>>,
}

impl Market {
    /// First non-empty end-date field, following [`END_DATE_FIELDS`]
    pub fn end_date_raw(&self) -> Option<&str> {
        [
            &self.end_date_iso,
            &self.end_date,
            &self.resolved_at,
            &self.close_time,
        ]
        .into_iter()
        .filter_map(|field| field.as_deref())
        .find(|value| !value.trim().is_empty())
    }

    /// `market_slug`, falling back to `slug`
    pub fn slug(&self) -> Option<&str> {
        [&self.market_slug, &self.slug]
            .into_iter()
            .filter_map(|field| field.as_deref())
            .find(|value| !value.trim().is_empty())
    }

    /// Tokens in upstream order (empty when the field is missing)
    pub fn tokens(&self) -> &[Token] {
        self.tokens.as_deref().unwrap_or_default()
    }
}

/// A single price observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Unix timestamp in seconds
    pub t: i64,
    /// Price between 0 and 1
    pub p: f64,
}

/// Response from the `/prices-history` endpoint
#[derive(Debug, Deserialize)]
pub(crate) struct PricesHistoryResponse {
    #[serde(default)]
    pub history: Vec<PricePoint>,
}

/// One page of the `/markets` listing
#[derive(Debug, Clone, Default)]
pub struct ListingPage {
    pub markets: Vec<Market>,
    pub next_cursor: Option<String>,
}

impl ListingPage {
    /// Extract markets and cursor from a listing response body
    ///
    /// Accepts `{"markets": [...]}`, `{"data": [...]}` or a bare array. Entries
    /// that are not objects, or do not look like a market, are dropped.
    pub fn from_json(body: Value) -> Self {
        let next_cursor = body
            .get("next_cursor")
            .and_then(Value::as_str)
            .map(str::to_string);

        let entries = match body {
            Value::Array(items) => items,
            Value::Object(mut map) => ["markets", "data"]
                .into_iter()
                .filter_map(|key| match map.remove(key) {
                    Some(Value::Array(items)) if !items.is_empty() => Some(items),
                    _ => None,
                })
                .next()
                .unwrap_or_default(),
            _ => Vec::new(),
        };

        let markets = entries
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|entry| match serde_json::from_value::<Market>(entry) {
                Ok(market) => Some(market),
                Err(e) => {
                    tracing::debug!(error = %e, "Dropping malformed market entry");
                    None
                }
            })
            .collect();

        Self {
            markets,
            next_cursor,
        }
    }

    /// Cursor for the following page, or `None` when this page is the last
    pub fn continuation(&self) -> Option<&str> {
        self.next_cursor
            .as_deref()
            .filter(|cursor| !cursor.is_empty() && *cursor != END_CURSOR)
    }
}
