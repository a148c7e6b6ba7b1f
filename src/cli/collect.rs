//! Collect command implementation

use crate::collect::Collector;
use crate::config::{CollectConfig, Config, HistoryErrorPolicy, WindowPolicy};
use crate::market::{ClobClient, ClobConfig, MarketFilter};
use chrono::Utc;
use clap::Args;
use std::path::PathBuf;
use tracing::Instrument;
use uuid::Uuid;

#[derive(Args, Debug, Default)]
pub struct CollectArgs {
    /// Output directory for history files
    #[arg(short, long, env = "POLYHIST_OUTPUT_DIR")]
    pub output: Option<PathBuf>,

    /// Only markets ending within this many days
    #[arg(long, env = "POLYHIST_LOOKBACK_DAYS")]
    pub lookback_days: Option<u32>,

    /// Whether markets that have not ended yet are collected
    #[arg(long, value_enum, env = "POLYHIST_WINDOW_POLICY")]
    pub window_policy: Option<WindowPolicy>,

    /// Price history sampling granularity
    #[arg(long, env = "POLYHIST_FIDELITY")]
    pub fidelity: Option<String>,

    /// Skip or abort on a failed price history request
    #[arg(long, value_enum, env = "POLYHIST_ON_HISTORY_ERROR")]
    pub on_history_error: Option<HistoryErrorPolicy>,
}

impl CollectArgs {
    /// Overlay command-line values on the configured ones
    pub fn apply(&self, config: &mut CollectConfig) {
        if let Some(output) = &self.output {
            config.output_dir = output.clone();
        }
        if let Some(days) = self.lookback_days {
            config.lookback_days = days;
        }
        if let Some(policy) = self.window_policy {
            config.window_policy = policy;
        }
        if let Some(fidelity) = &self.fidelity {
            config.fidelity = fidelity.clone();
        }
        if let Some(policy) = self.on_history_error {
            config.on_history_error = policy;
        }
    }

    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let mut settings = config.collect.clone();
        self.apply(&mut settings);

        tracing::info!(
            output = ?settings.output_dir,
            lookback_days = settings.lookback_days,
            policy = ?settings.window_policy,
            fidelity = %settings.fidelity,
            "Starting history collection"
        );

        let client = ClobClient::with_config(ClobConfig::from_config(&config.api, &settings))?;
        let mut collector = Collector::open(
            client.clone(),
            client,
            &settings.output_dir,
            MarketFilter::from_config(&settings),
            settings.on_history_error,
        )?;

        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("collect", %run_id);

        let finished = tokio::select! {
            result = collector.run(Utc::now()).instrument(span) => Some(result),
            _ = tokio::signal::ctrl_c() => None,
        };

        match finished {
            Some(result) => println!("{}", result?),
            None => {
                let stats = collector.stats();
                tracing::warn!(
                    files_written = stats.files_written,
                    failed = stats.tokens_failed(),
                    "Interrupted, stored histories are kept for the next run"
                );
                println!("{}", stats);
                anyhow::bail!("collection interrupted");
            }
        }

        Ok(())
    }
}
