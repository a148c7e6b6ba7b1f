//! History storage module
//!
//! One JSON file per (market slug, token id), written once and never rewritten

mod record;
mod store;

pub use record::{history_file_name, sanitize_slug, HistoryRecord};
pub use store::{HistoryStore, JsonHistoryStore, StoreError, WriteOutcome};
