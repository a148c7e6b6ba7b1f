//! Backtest command implementation

use crate::backtest::{BacktestConfig, PayoutSimulator};
use crate::config::{BacktestSettings, Config};
use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// Report output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Args, Debug)]
pub struct BacktestArgs {
    /// Directory containing history files
    #[arg(long, env = "POLYHIST_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Skip files whose name contains this (case-insensitive)
    #[arg(long)]
    pub exclude: Option<String>,

    /// Entry point before the last observation, in hours
    #[arg(long)]
    pub entry_hours: Option<u64>,

    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

impl BacktestArgs {
    /// Overlay command-line values on the configured ones
    pub fn apply(&self, settings: &mut BacktestSettings) {
        if let Some(dir) = &self.data_dir {
            settings.data_dir = dir.clone();
        }
        if let Some(pattern) = &self.exclude {
            settings.exclude_pattern = Some(pattern.clone());
        }
        if let Some(hours) = self.entry_hours {
            settings.entry_horizon_hours = hours;
        }
    }

    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let mut settings = config.backtest.clone();
        self.apply(&mut settings);

        tracing::info!(data_dir = ?settings.data_dir, "Running payout analysis");
        let report = PayoutSimulator::new(BacktestConfig::from_settings(&settings)).run()?;

        match self.format {
            OutputFormat::Table => println!("{}", report.format_table()),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        }

        Ok(())
    }
}
