//! CLI interface for poly-history
//!
//! Provides subcommands for:
//! - `collect`: Download price histories for recently ended markets
//! - `backtest`: Payout analysis over collected histories
//! - `config`: Show the effective configuration

mod backtest;
mod collect;

pub use backtest::{BacktestArgs, OutputFormat};
pub use collect::CollectArgs;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "poly-history")]
#[command(about = "Collect and analyse Polymarket outcome-token price histories")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml", env = "POLYHIST_CONFIG")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download price histories (resumes where the last run stopped)
    Collect(CollectArgs),
    /// Run payout analysis on collected histories
    Backtest(BacktestArgs),
    /// Show configuration
    Config,
}
