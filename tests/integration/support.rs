//! In-memory upstream stand-ins shared by the integration tests

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use poly_history::market::{
    ApiError, ListingPage, Market, MarketListing, PriceHistorySource, PricePoint,
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
}

pub fn market(value: Value) -> Market {
    serde_json::from_value(value).unwrap()
}

pub fn points(prices: &[f64]) -> Vec<PricePoint> {
    prices
        .iter()
        .enumerate()
        .map(|(i, &p)| PricePoint {
            t: 1_700_000_000 + i as i64 * 60,
            p,
        })
        .collect()
}

/// Serves pre-built pages keyed by cursor
#[derive(Clone, Default)]
pub struct StubListing {
    pages: Arc<Mutex<HashMap<String, Result<ListingPage, u16>>>>,
    requested: Arc<Mutex<Vec<String>>>,
}

impl StubListing {
    pub fn page(self, cursor: &str, markets: Vec<Market>, next: Option<&str>) -> Self {
        self.pages.lock().unwrap().insert(
            cursor.to_string(),
            Ok(ListingPage {
                markets,
                next_cursor: next.map(str::to_string),
            }),
        );
        self
    }

    pub fn failing(self, cursor: &str, status: u16) -> Self {
        self.pages
            .lock()
            .unwrap()
            .insert(cursor.to_string(), Err(status));
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl MarketListing for StubListing {
    async fn fetch_page(&self, cursor: &str) -> Result<ListingPage, ApiError> {
        self.requested.lock().unwrap().push(cursor.to_string());
        match self.pages.lock().unwrap().get(cursor) {
            Some(Ok(page)) => Ok(page.clone()),
            Some(Err(status)) => Err(ApiError::Status {
                status: *status,
                body: "stub failure".to_string(),
            }),
            None => Err(ApiError::Status {
                status: 404,
                body: format!("no page for cursor {cursor:?}"),
            }),
        }
    }
}

/// Serves canned histories keyed by token id and records every request
#[derive(Clone, Default)]
pub struct StubHistory {
    histories: Arc<Mutex<HashMap<String, Result<Vec<PricePoint>, u16>>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl StubHistory {
    pub fn with(self, token_id: &str, history: Vec<PricePoint>) -> Self {
        self.histories
            .lock()
            .unwrap()
            .insert(token_id.to_string(), Ok(history));
        self
    }

    pub fn failing(self, token_id: &str, status: u16) -> Self {
        self.histories
            .lock()
            .unwrap()
            .insert(token_id.to_string(), Err(status));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PriceHistorySource for StubHistory {
    async fn fetch_history(&self, token_id: &str) -> Result<Vec<PricePoint>, ApiError> {
        self.calls.lock().unwrap().push(token_id.to_string());
        match self.histories.lock().unwrap().get(token_id) {
            Some(Ok(history)) => Ok(history.clone()),
            Some(Err(status)) => Err(ApiError::Status {
                status: *status,
                body: "stub failure".to_string(),
            }),
            None => Ok(Vec::new()),
        }
    }
}
