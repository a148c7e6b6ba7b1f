//! Loading collected histories for analysis

use crate::data::HistoryRecord;
use rust_decimal::Decimal;
use std::fs;
use std::path::Path;

/// A stored history ready for payout computation
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedHistory {
    /// File name the history was read from
    pub name: String,
    /// Unix timestamps (seconds), ascending
    pub timestamps: Vec<i64>,
    pub prices: Vec<Decimal>,
    pub outcome: Option<String>,
}

impl LoadedHistory {
    /// Convert a stored record; needs at least two usable points
    pub fn from_record(name: impl Into<String>, record: HistoryRecord) -> Option<Self> {
        let (timestamps, prices): (Vec<i64>, Vec<Decimal>) = record
            .history
            .into_iter()
            .filter_map(|point| Decimal::try_from(point.p).ok().map(|p| (point.t, p)))
            .unzip();

        if timestamps.len() < 2 {
            return None;
        }

        Some(Self {
            name: name.into(),
            timestamps,
            prices,
            outcome: record.outcome,
        })
    }

    /// Timestamp of the last observation
    pub fn end_ts(&self) -> i64 {
        self.timestamps[self.timestamps.len() - 1]
    }

    /// Price at the last observation
    pub fn end_price(&self) -> Decimal {
        self.prices[self.prices.len() - 1]
    }

    /// Price at `target`, linearly interpolated between neighbouring points
    ///
    /// Targets before the first point take the first price, targets after the
    /// last point take the last price.
    pub fn price_at(&self, target: i64) -> Decimal {
        let idx = self.timestamps.partition_point(|&t| t < target);
        if idx == 0 {
            return self.prices[0];
        }
        if idx >= self.timestamps.len() {
            return self.end_price();
        }

        let (t0, t1) = (self.timestamps[idx - 1], self.timestamps[idx]);
        let (p0, p1) = (self.prices[idx - 1], self.prices[idx]);
        if t1 == t0 {
            return p0;
        }
        p0 + (p1 - p0) * Decimal::from(target - t0) / Decimal::from(t1 - t0)
    }

    /// Price `horizon_secs` before the last observation
    pub fn price_before_end(&self, horizon_secs: i64) -> Decimal {
        self.price_at(self.end_ts() - horizon_secs)
    }
}

/// Read every usable history file in `dir`, sorted by file name
///
/// Files whose lower-cased name contains `exclude` are skipped, as are
/// unreadable files and histories with fewer than two points.
pub fn load_histories(dir: &Path, exclude: Option<&str>) -> anyhow::Result<Vec<LoadedHistory>> {
    let exclude = exclude
        .map(str::to_lowercase)
        .filter(|pattern| !pattern.is_empty());

    let mut names: Vec<String> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".json") && !name.starts_with('.'))
        .collect();
    names.sort();

    let mut histories = Vec::with_capacity(names.len());
    for name in names {
        if let Some(pattern) = &exclude {
            if name.to_lowercase().contains(pattern.as_str()) {
                continue;
            }
        }

        let record = match HistoryRecord::load(dir.join(&name)) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(file = %name, error = %e, "Skipping unreadable history file");
                continue;
            }
        };

        if let Some(history) = LoadedHistory::from_record(name, record) {
            histories.push(history);
        }
    }

    tracing::info!(dir = ?dir, count = histories.len(), "Loaded histories");
    Ok(histories)
}
