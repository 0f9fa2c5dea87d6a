//! Metrics catalog for dataset loading and dashboard queries.
//!
//! Names follow the Prometheus conventions; recording goes through the
//! `metrics` facade so nothing is collected until an exporter is installed.

use std::fmt;
use std::net::SocketAddr;
use tracing::{info, warn};

/// All metric names used by the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    // Normalize metrics
    NormalizeRowsRead,
    NormalizeDuplicatesDropped,
    NormalizeRecordsProduced,
    NormalizeDuration,

    // Query metrics
    QueryRequests,
    QueryEmptyResults,
    QueryDuration,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::NormalizeRowsRead => "fome_zero_normalize_rows_read_total",
            MetricName::NormalizeDuplicatesDropped => "fome_zero_normalize_duplicates_dropped_total",
            MetricName::NormalizeRecordsProduced => "fome_zero_normalize_records_produced_total",
            MetricName::NormalizeDuration => "fome_zero_normalize_duration_seconds",
            MetricName::QueryRequests => "fome_zero_query_requests_total",
            MetricName::QueryEmptyResults => "fome_zero_query_empty_results_total",
            MetricName::QueryDuration => "fome_zero_query_duration_seconds",
        }
    }

    pub fn all_metrics() -> impl Iterator<Item = MetricName> {
        use MetricName::*;
        [
            NormalizeRowsRead,
            NormalizeDuplicatesDropped,
            NormalizeRecordsProduced,
            NormalizeDuration,
            QueryRequests,
            QueryEmptyResults,
            QueryDuration,
        ]
        .into_iter()
    }

    /// Human description, used when registering the metric
    pub fn description(&self) -> &'static str {
        match self {
            MetricName::NormalizeRowsRead => "Raw rows read from the source file",
            MetricName::NormalizeDuplicatesDropped => "Exact duplicate rows removed",
            MetricName::NormalizeRecordsProduced => "Canonical records produced",
            MetricName::NormalizeDuration => "Time spent loading and normalizing the dataset",
            MetricName::QueryRequests => "Dashboard page queries served",
            MetricName::QueryEmptyResults => "Leaderboard queries with nothing to rank",
            MetricName::QueryDuration => "Time spent computing a dashboard page",
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Install the Prometheus exporter with an HTTP listener on `port`
pub fn init_metrics(port: u16) {
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    let builder = metrics_exporter_prometheus::PrometheusBuilder::new().with_http_listener(addr);
    match builder.install() {
        Ok(()) => {
            for metric in MetricName::all_metrics() {
                if metric.as_str().ends_with("_seconds") {
                    metrics::describe_histogram!(metric.as_str(), metric.description());
                } else {
                    metrics::describe_counter!(metric.as_str(), metric.description());
                }
            }
            info!("Prometheus exporter listening on http://{}/metrics", addr);
        }
        Err(e) => {
            warn!("Prometheus exporter install failed (possibly already installed): {}", e);
        }
    }
}

pub mod normalize {
    use super::MetricName;
    use crate::pipeline::NormalizationStats;
    use std::time::Duration;

    pub fn record_run(stats: &NormalizationStats, elapsed: Duration) {
        metrics::counter!(MetricName::NormalizeRowsRead.as_str()).increment(stats.rows_read as u64);
        metrics::counter!(MetricName::NormalizeDuplicatesDropped.as_str())
            .increment(stats.duplicates_dropped as u64);
        metrics::counter!(MetricName::NormalizeRecordsProduced.as_str())
            .increment(stats.records as u64);
        metrics::histogram!(MetricName::NormalizeDuration.as_str()).record(elapsed.as_secs_f64());
    }
}

pub mod query {
    use super::MetricName;
    use std::time::Duration;

    pub fn record_request(page: &'static str, elapsed: Duration) {
        metrics::counter!(MetricName::QueryRequests.as_str(), "page" => page).increment(1);
        metrics::histogram!(MetricName::QueryDuration.as_str(), "page" => page)
            .record(elapsed.as_secs_f64());
    }

    pub fn record_empty(metric: &'static str) {
        metrics::counter!(MetricName::QueryEmptyResults.as_str(), "metric" => metric).increment(1);
    }
}
