//! Payout reporting

use rust_decimal::Decimal;
use serde::Serialize;

/// Aggregate payout of one scenario
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayoutSummary {
    pub label: String,
    /// Entry point before the last observation (seconds)
    pub horizon_secs: i64,
    /// Sum of (end price - entry price)
    pub total: Decimal,
    /// Histories bought
    pub count: usize,
    /// `total / count`, absent when nothing was bought
    pub average: Option<Decimal>,
}

impl PayoutSummary {
    pub fn new(label: String, horizon_secs: i64, total: Decimal, count: usize) -> Self {
        let average = (count > 0).then(|| total / Decimal::from(count));
        Self {
            label,
            horizon_secs,
            total,
            count,
            average,
        }
    }
}

/// Complete payout analysis
#[derive(Debug, Clone, Default, Serialize)]
pub struct BacktestReport {
    /// Histories that entered the analysis
    pub histories: usize,
    pub scenarios: Vec<PayoutSummary>,
}

impl BacktestReport {
    /// Format as table for CLI output
    pub fn format_table(&self) -> String {
        let mut rows = String::new();
        for s in &self.scenarios {
            let average = match s.average {
                Some(avg) => format!("{:+.4}", avg),
                None => "-".to_string(),
            };
            rows.push_str(&format!(
                "{:<28} {:>6} {:>9} {:>6} {:>9}\n",
                s.label,
                format_horizon(s.horizon_secs),
                format!("{:+.2}", s.total),
                s.count,
                average,
            ));
        }

        format!(
            r#"
══════════════════════════════════════════════════════════════════
               PAYOUT ANALYSIS
══════════════════════════════════════════════════════════════════

Histories analysed: {}
Payout = end price - price at entry, one unit per market

{:<28} {:>6} {:>9} {:>6} {:>9}
──────────────────────────────────────────────────────────────────
{}══════════════════════════════════════════════════════════════════
"#,
            self.histories, "SCENARIO", "ENTRY", "TOTAL", "N", "AVG", rows,
        )
    }
}

/// Short label for a horizon, e.g. `1h`, `7d`, `1d12h`
pub fn format_horizon(secs: i64) -> String {
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    if minutes != 0 || hours == 0 {
        return format!("{}m", secs / 60);
    }

    match (hours / 24, hours % 24) {
        (0, h) => format!("{}h", h),
        (d, 0) => format!("{}d", d),
        (d, h) => format!("{}d{}h", d, h),
    }
}
