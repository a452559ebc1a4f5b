//! Metrics and observability utilities
//!
//! Counters and histograms behind the `metrics` facade with a shared
//! `rentnest` prefix. Nothing is exported unless the binary installs a
//! recorder; without one every call is a no-op.

use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use std::time::Instant;

/// Metrics prefix for all RentNest metrics
pub const METRICS_PREFIX: &str = "rentnest";

/// Register all metric descriptions
pub fn register_metrics() {
    describe_counter!(
        format!("{}_requests_total", METRICS_PREFIX),
        Unit::Count,
        "Total number of HTTP requests"
    );

    describe_histogram!(
        format!("{}_request_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "HTTP request latency in seconds"
    );

    describe_counter!(
        format!("{}_feed_requests_total", METRICS_PREFIX),
        Unit::Count,
        "Feed pages rendered, by sort key"
    );

    describe_histogram!(
        format!("{}_feed_page_items", METRICS_PREFIX),
        Unit::Count,
        "Listings on a rendered feed page"
    );

    describe_counter!(
        format!("{}_malformed_samples_total", METRICS_PREFIX),
        Unit::Count,
        "Agent sample listings dropped during aggregation"
    );

    describe_counter!(
        format!("{}_validation_failures_total", METRICS_PREFIX),
        Unit::Count,
        "Property form validation failures, by field"
    );

    describe_counter!(
        format!("{}_submissions_total", METRICS_PREFIX),
        Unit::Count,
        "Property submissions, by outcome"
    );

    describe_counter!(
        format!("{}_session_events_total", METRICS_PREFIX),
        Unit::Count,
        "Login, registration and logout events, by outcome"
    );

    tracing::info!("Metrics registered");
}

/// Helper to record request metrics
pub struct RequestMetrics {
    start: Instant,
    endpoint: String,
    method: String,
}

impl RequestMetrics {
    /// Start tracking a request
    pub fn start(method: &str, endpoint: &str) -> Self {
        Self {
            start: Instant::now(),
            endpoint: endpoint.to_string(),
            method: method.to_string(),
        }
    }

    /// Record request completion
    pub fn finish(self, status: u16) {
        let duration = self.start.elapsed().as_secs_f64();

        counter!(
            format!("{}_requests_total", METRICS_PREFIX),
            "method" => self.method.clone(),
            "endpoint" => self.endpoint.clone(),
            "status" => status.to_string()
        )
        .increment(1);

        histogram!(
            format!("{}_request_duration_seconds", METRICS_PREFIX),
            "method" => self.method,
            "endpoint" => self.endpoint
        )
        .record(duration);
    }
}

pub fn record_feed(sort_key: &str, items: usize) {
    counter!(
        format!("{}_feed_requests_total", METRICS_PREFIX),
        "sort" => sort_key.to_string()
    )
    .increment(1);

    histogram!(format!("{}_feed_page_items", METRICS_PREFIX)).record(items as f64);
}

pub fn record_malformed_sample() {
    counter!(format!("{}_malformed_samples_total", METRICS_PREFIX)).increment(1);
}

pub fn record_validation_failure(field: &str) {
    counter!(
        format!("{}_validation_failures_total", METRICS_PREFIX),
        "field" => field.to_string()
    )
    .increment(1);
}

pub fn record_submission(outcome: &str) {
    counter!(
        format!("{}_submissions_total", METRICS_PREFIX),
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

pub fn record_session_event(event: &str, outcome: &str) {
    counter!(
        format!("{}_session_events_total", METRICS_PREFIX),
        "event" => event.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
}
