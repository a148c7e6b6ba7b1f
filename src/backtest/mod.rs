//! Payout analysis module
//!
//! Replays collected histories and reports what buying one unit some time
//! before the end and holding to the last observation would have paid.

mod analytics;
mod replay;
mod simulator;

pub use analytics::{format_horizon, BacktestReport, PayoutSummary};
pub use replay::{load_histories, LoadedHistory};
pub use simulator::{PayoutSimulator, Scenario, Selector};

use crate::config::BacktestSettings;
use rust_decimal::Decimal;
use std::path::PathBuf;

/// Backtest configuration
#[derive(Debug, Clone)]
pub struct BacktestConfig {
    /// Directory containing history files
    pub data_dir: PathBuf,
    /// Skip files whose lower-cased name contains this
    pub exclude_pattern: Option<String>,
    /// Entry point before the end for the fixed-horizon scenarios
    pub entry_horizon_secs: i64,
    pub entry_price_threshold: Decimal,
    /// Horizons swept for the "No" outcome scenario
    pub outcome_horizons_secs: Vec<i64>,
}

impl BacktestConfig {
    pub fn from_settings(settings: &BacktestSettings) -> Self {
        let hours_to_secs = |hours: u64| i64::try_from(hours).unwrap_or(i64::MAX).saturating_mul(3600);
        Self {
            data_dir: settings.data_dir.clone(),
            exclude_pattern: settings.exclude_pattern.clone(),
            entry_horizon_secs: hours_to_secs(settings.entry_horizon_hours),
            entry_price_threshold: settings.entry_price_threshold,
            outcome_horizons_secs: settings
                .outcome_horizons_hours
                .iter()
                .copied()
                .map(hours_to_secs)
                .collect(),
        }
    }
}
