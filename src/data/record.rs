//! Persisted history record and file naming

use crate::market::PricePoint;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Contents of one per-token history file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Price points, oldest first
    pub history: Vec<PricePoint>,
    /// Outcome label of the token, when known
    #[serde(default)]
    pub outcome: Option<String>,
}

impl HistoryRecord {
    pub fn new(history: Vec<PricePoint>, outcome: Option<String>) -> Self {
        Self { history, outcome }
    }

    /// Read a record from disk
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read(path)?;
        Ok(serde_json::from_slice(&content)?)
    }
}

/// Make a slug safe to use as a file name component
pub fn sanitize_slug(slug: &str) -> String {
    slug.replace(['/', ' '], "_")
}

/// File name for the history of `token_id` in market `slug`
pub fn history_file_name(slug: &str, token_id: &str) -> String {
    format!("{}_{}.json", sanitize_slug(slug), token_id)
}
