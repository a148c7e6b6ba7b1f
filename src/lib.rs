//! poly-history: Polymarket price history collection and payout analysis
//!
//! This library provides the core components for:
//! - Paginated market listing from the CLOB API
//! - End-date eligibility filtering over a lookback window
//! - Full-range price history download per outcome token
//! - Resumable on-disk JSON storage, one file per token
//! - Payout backtests over the collected histories
//! - Structured logging and Prometheus metrics

pub mod backtest;
pub mod cli;
pub mod collect;
pub mod config;
pub mod data;
pub mod market;
pub mod telemetry;
