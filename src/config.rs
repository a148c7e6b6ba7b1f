//! Configuration types for poly-history

use clap::ValueEnum;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub collect: CollectConfig,
    #[serde(default)]
    pub backtest: BacktestSettings,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Upstream CLOB API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL serving `/markets` and `/prices-history`
    #[serde(default = "default_clob_url")]
    pub clob_url: String,
    /// Per-request timeout (seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_clob_url() -> String {
    crate::market::CLOB_API_URL.to_string()
}
fn default_timeout_secs() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            clob_url: default_clob_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Which end dates fall inside the collection window
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default, ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum WindowPolicy {
    /// End date within the lookback window, past or future
    #[default]
    AnyResolution,
    /// End date within the lookback window and not after now
    EndedOnly,
}

/// What a failed price-history request does to the run
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum HistoryErrorPolicy {
    /// Log the failure and move on to the next token
    #[default]
    Skip,
    /// Abort the whole run
    Abort,
}

/// Collection pipeline configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CollectConfig {
    /// Directory holding one JSON file per token
    #[serde(default = "default_history_dir")]
    pub output_dir: PathBuf,

    /// Lookback window applied to market end dates (days)
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,

    #[serde(default)]
    pub window_policy: WindowPolicy,

    /// Sampling granularity passed to `/prices-history`
    #[serde(default = "default_fidelity")]
    pub fidelity: String,

    #[serde(default)]
    pub on_history_error: HistoryErrorPolicy,
}

fn default_history_dir() -> PathBuf {
    PathBuf::from("market_histories")
}
fn default_lookback_days() -> u32 {
    30
}
fn default_fidelity() -> String {
    "1".to_string()
}

impl Default for CollectConfig {
    fn default() -> Self {
        Self {
            output_dir: default_history_dir(),
            lookback_days: default_lookback_days(),
            window_policy: WindowPolicy::default(),
            fidelity: default_fidelity(),
            on_history_error: HistoryErrorPolicy::default(),
        }
    }
}

/// Payout analysis configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BacktestSettings {
    /// Directory containing collected history files
    #[serde(default = "default_history_dir")]
    pub data_dir: PathBuf,

    /// Files whose lower-cased name contains this are ignored
    #[serde(default = "default_exclude_pattern")]
    pub exclude_pattern: Option<String>,

    /// Entry point before the last observation (hours)
    #[serde(default = "default_entry_horizon_hours")]
    pub entry_horizon_hours: u64,

    /// Entry price a history must exceed for the threshold scenario
    #[serde(default = "default_entry_price_threshold")]
    pub entry_price_threshold: Decimal,

    /// Horizons swept for the "No" outcome scenario (hours)
    #[serde(default = "default_outcome_horizons_hours")]
    pub outcome_horizons_hours: Vec<u64>,
}

fn default_exclude_pattern() -> Option<String> {
    Some("vs".to_string())
}
fn default_entry_horizon_hours() -> u64 {
    7 * 24
}
fn default_entry_price_threshold() -> Decimal {
    Decimal::new(8, 1) // 0.8
}
fn default_outcome_horizons_hours() -> Vec<u64> {
    vec![1, 6, 12, 24, 48, 72, 120, 168, 240, 336]
}

impl Default for BacktestSettings {
    fn default() -> Self {
        Self {
            data_dir: default_history_dir(),
            exclude_pattern: default_exclude_pattern(),
            entry_horizon_hours: default_entry_horizon_hours(),
            entry_price_threshold: default_entry_price_threshold(),
            outcome_horizons_hours: default_outcome_horizons_hours(),
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_format: crate::telemetry::LogFormat,
    /// Serve Prometheus metrics on this port when set
    #[serde(default)]
    pub metrics_port: Option<u16>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: crate::telemetry::LogFormat::default(),
            metrics_port: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }
}
