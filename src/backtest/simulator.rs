//! Payout computation over collected histories

use super::analytics::{format_horizon, BacktestReport, PayoutSummary};
use super::replay::{load_histories, LoadedHistory};
use super::BacktestConfig;
use rust_decimal::Decimal;

/// Which histories a scenario buys
#[derive(Debug, Clone, PartialEq)]
pub enum Selector {
    /// Every history
    All,
    /// Histories whose entry price is strictly above the threshold
    EntryAbove(Decimal),
    /// Histories whose outcome label matches exactly
    Outcome(String),
}

impl Selector {
    fn selects(&self, history: &LoadedHistory, entry_price: Decimal) -> bool {
        match self {
            Selector::All => true,
            Selector::EntryAbove(threshold) => entry_price > *threshold,
            Selector::Outcome(label) => history.outcome.as_deref() == Some(label.as_str()),
        }
    }
}

/// Buy one unit `horizon_secs` before the last observation, sell at the last
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub label: String,
    pub horizon_secs: i64,
    pub selector: Selector,
}

impl Scenario {
    /// Total payout of this scenario across `histories`
    pub fn evaluate(&self, histories: &[LoadedHistory]) -> PayoutSummary {
        let mut total = Decimal::ZERO;
        let mut count = 0;

        for history in histories {
            let entry = history.price_before_end(self.horizon_secs);
            if !self.selector.selects(history, entry) {
                continue;
            }
            total += history.end_price() - entry;
            count += 1;
        }

        PayoutSummary::new(self.label.clone(), self.horizon_secs, total, count)
    }
}

/// Runs the standard payout scenarios
pub struct PayoutSimulator {
    config: BacktestConfig,
}

impl PayoutSimulator {
    /// Create a new simulator
    pub fn new(config: BacktestConfig) -> Self {
        Self { config }
    }

    /// Scenarios evaluated by [`run`](Self::run)
    pub fn scenarios(&self) -> Vec<Scenario> {
        let entry = self.config.entry_horizon_secs;
        let mut scenarios = vec![
            Scenario {
                label: "All markets".to_string(),
                horizon_secs: entry,
                selector: Selector::All,
            },
            Scenario {
                label: format!("Entry price > {}", self.config.entry_price_threshold),
                horizon_secs: entry,
                selector: Selector::EntryAbove(self.config.entry_price_threshold),
            },
            Scenario {
                label: "Outcome Yes".to_string(),
                horizon_secs: entry,
                selector: Selector::Outcome("Yes".to_string()),
            },
        ];

        scenarios.extend(self.config.outcome_horizons_secs.iter().map(|&horizon| Scenario {
            label: format!("Outcome No, {} out", format_horizon(horizon)),
            horizon_secs: horizon,
            selector: Selector::Outcome("No".to_string()),
        }));

        scenarios
    }

    /// Load the data directory and evaluate every scenario
    pub fn run(&self) -> anyhow::Result<BacktestReport> {
        let histories = load_histories(
            &self.config.data_dir,
            self.config.exclude_pattern.as_deref(),
        )?;
        Ok(self.run_on(&histories))
    }

    /// Evaluate every scenario over already-loaded histories
    pub fn run_on(&self, histories: &[LoadedHistory]) -> BacktestReport {
        let scenarios = self
            .scenarios()
            .iter()
            .map(|scenario| scenario.evaluate(histories))
            .collect();

        BacktestReport {
            histories: histories.len(),
            scenarios,
        }
    }
}
