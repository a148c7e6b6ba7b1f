//! History collection module
//!
//! Market listing pages → end-date filter → price history fetch → history store

mod collector;
mod pages;
mod types;

pub use collector::Collector;
pub use pages::market_pages;
pub use types::{CollectError, CollectStats};
