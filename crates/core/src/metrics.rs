//! Metrics definitions for the gateway.
//!
//! This module defines all metrics used throughout the gateway.
//! Metrics are collected using the `metrics` crate and can be exported
//! to Prometheus via `metrics-exporter-prometheus`.

use metrics::{counter, describe_counter, describe_histogram, histogram};
use std::time::Instant;

use crate::error::Upstream;

/// Initialize all metric descriptions.
/// Call this once at startup before any metrics are recorded.
pub fn init_metrics() {
    describe_counter!(
        "upstream_requests_total",
        "Total number of upstream calls, labelled by upstream and outcome"
    );
    describe_histogram!(
        "upstream_request_duration_seconds",
        "Time taken by an upstream call in seconds"
    );
    describe_counter!(
        "trending_lookups_dropped_total",
        "Total number of trending titles dropped because no OMDb record matched"
    );
}

/// Record the outcome of an upstream call.
///
/// # Arguments
/// * `upstream` - The upstream API that was called
/// * `outcome` - `found`, `no_match` or `failed`
pub fn record_upstream_request(upstream: Upstream, outcome: &'static str) {
    counter!("upstream_requests_total", "upstream" => upstream.as_str(), "outcome" => outcome)
        .increment(1);
}

/// Record upstream call duration.
pub fn record_upstream_duration(upstream: Upstream, duration_secs: f64) {
    histogram!("upstream_request_duration_seconds", "upstream" => upstream.as_str())
        .record(duration_secs);
}

/// Record trending titles dropped from a page.
pub fn record_trending_dropped(count: u64) {
    counter!("trending_lookups_dropped_total").increment(count);
}

/// A timer that records upstream call duration when dropped.
pub struct UpstreamTimer {
    upstream: Upstream,
    start: Instant,
}

impl UpstreamTimer {
    /// Start a new timer for a call to `upstream`.
    pub fn new(upstream: Upstream) -> Self {
        Self {
            upstream,
            start: Instant::now(),
        }
    }
}

impl Drop for UpstreamTimer {
    fn drop(&mut self) {
        record_upstream_duration(self.upstream, self.start.elapsed().as_secs_f64());
    }
}
