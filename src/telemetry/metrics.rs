//! Prometheus metrics

use metrics_exporter_prometheus::PrometheusBuilder;
use std::time::Duration;

/// Latency metric types
#[derive(Debug, Clone, Copy)]
pub enum LatencyMetric {
    /// One `/markets` page
    ListingPage,
    /// One `/prices-history` lookup
    PriceHistory,
}

/// Counter metric types
#[derive(Debug, Clone, Copy)]
pub enum CounterMetric {
    PagesFetched,
    MarketsSeen,
    MarketsEligible,
    TokensSkippedExisting,
    TokensEmpty,
    FilesWritten,
    HistoryFailures,
    WriteFailures,
}

impl CounterMetric {
    fn name(self) -> &'static str {
        match self {
            CounterMetric::PagesFetched => "polyhist_pages_fetched_total",
            CounterMetric::MarketsSeen => "polyhist_markets_seen_total",
            CounterMetric::MarketsEligible => "polyhist_markets_eligible_total",
            CounterMetric::TokensSkippedExisting => "polyhist_tokens_skipped_existing_total",
            CounterMetric::TokensEmpty => "polyhist_tokens_empty_total",
            CounterMetric::FilesWritten => "polyhist_files_written_total",
            CounterMetric::HistoryFailures => "polyhist_history_failures_total",
            CounterMetric::WriteFailures => "polyhist_write_failures_total",
        }
    }
}

/// Record a latency measurement
pub fn record_latency(metric: LatencyMetric, duration: Duration) {
    let metric_name = match metric {
        LatencyMetric::ListingPage => "polyhist_listing_latency_ms",
        LatencyMetric::PriceHistory => "polyhist_price_history_latency_ms",
    };

    metrics::histogram!(metric_name).record(duration.as_secs_f64() * 1000.0);
}

/// Bump a counter by one
pub fn increment(metric: CounterMetric) {
    metrics::counter!(metric.name()).increment(1);
}

/// Serve Prometheus metrics on `0.0.0.0:port`
///
/// Must be called from inside the tokio runtime.
pub fn install_exporter(port: u16) -> anyhow::Result<()> {
    PrometheusBuilder::new()
        .with_http_listener(([0, 0, 0, 0], port))
        .install()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics exporter: {}", e))?;

    tracing::info!(port, "Prometheus metrics exporter listening");
    Ok(())
}
