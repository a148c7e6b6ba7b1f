//! Market eligibility filter
//!
//! Decides which listed markets are worth collecting based on their end date.

use super::Market;
use crate::config::{CollectConfig, WindowPolicy};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};

/// Why a market was left out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// None of the end-date fields is present
    MissingEndDate,
    /// End date present but not a recognizable timestamp
    UnparseableEndDate,
    /// End date older than the lookback window
    OutsideWindow,
    /// End date still ahead while only ended markets are wanted
    NotYetEnded,
    MissingSlug,
    MissingTokens,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::MissingEndDate => "missing_end_date",
            RejectReason::UnparseableEndDate => "unparseable_end_date",
            RejectReason::OutsideWindow => "outside_window",
            RejectReason::NotYetEnded => "not_yet_ended",
            RejectReason::MissingSlug => "missing_slug",
            RejectReason::MissingTokens => "missing_tokens",
        }
    }
}

/// Outcome of filtering one market
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    Eligible { end_date: DateTime<Utc> },
    Rejected(RejectReason),
}

impl Eligibility {
    pub fn is_eligible(&self) -> bool {
        matches!(self, Eligibility::Eligible { .. })
    }

    /// Resolved end date of an eligible market
    pub fn end_date(&self) -> Option<DateTime<Utc>> {
        match self {
            Eligibility::Eligible { end_date } => Some(*end_date),
            Eligibility::Rejected(_) => None,
        }
    }
}

/// End-date window filter
#[derive(Debug, Clone)]
pub struct MarketFilter {
    policy: WindowPolicy,
    lookback: Duration,
}

impl MarketFilter {
    pub fn new(policy: WindowPolicy, lookback: Duration) -> Self {
        Self { policy, lookback }
    }

    pub fn from_config(config: &CollectConfig) -> Self {
        Self::new(
            config.window_policy,
            Duration::days(i64::from(config.lookback_days)),
        )
    }

    pub fn policy(&self) -> WindowPolicy {
        self.policy
    }

    /// Evaluate a market against the window ending at `now`
    pub fn evaluate(&self, market: &Market, now: DateTime<Utc>) -> Eligibility {
        let Some(raw) = market.end_date_raw() else {
            return Eligibility::Rejected(RejectReason::MissingEndDate);
        };
        let Some(end_date) = parse_end_date(raw) else {
            return Eligibility::Rejected(RejectReason::UnparseableEndDate);
        };

        // A lookback reaching past the representable range has no lower bound
        let window_start = now.checked_sub_signed(self.lookback);
        if window_start.is_some_and(|start| end_date < start) {
            return Eligibility::Rejected(RejectReason::OutsideWindow);
        }
        if self.policy == WindowPolicy::EndedOnly && end_date > now {
            return Eligibility::Rejected(RejectReason::NotYetEnded);
        }

        if market.slug().is_none() {
            return Eligibility::Rejected(RejectReason::MissingSlug);
        }
        if market.tokens().is_empty() {
            return Eligibility::Rejected(RejectReason::MissingTokens);
        }

        Eligibility::Eligible { end_date }
    }
}

/// Parse an upstream end date
///
/// Accepts RFC 3339 with `Z` or an offset, naive date-times (read as UTC)
/// and bare dates (midnight UTC).
pub fn parse_end_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
