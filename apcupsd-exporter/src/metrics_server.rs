//! The exporter's own metrics, served on `/metrics`.
//!
//! UPS readings never go through this recorder; they are rendered per scrape by
//! [`crate::exposition`].

use std::time::Duration;

use axum::extract::State;
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};

use crate::server::AppState;

pub const SCRAPES_TOTAL: &str = "apcupsd_exporter_scrapes_total";
pub const SCRAPE_DURATION_SECONDS: &str = "apcupsd_exporter_scrape_duration_seconds";
pub const REJECTED_REQUESTS_TOTAL: &str = "apcupsd_exporter_rejected_requests_total";

/// Upper bounds for the scrape duration histogram. A scrape is one short TCP
/// exchange, bounded by the 10 s connect timeout.
const SCRAPE_DURATION_BUCKETS: &[f64] = &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];

pub fn builder() -> anyhow::Result<PrometheusBuilder> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full(SCRAPE_DURATION_SECONDS.to_string()),
            SCRAPE_DURATION_BUCKETS,
        )
        .map_err(|e| anyhow::anyhow!("invalid histogram buckets: {e}"))
}

pub fn install_recorder() -> anyhow::Result<PrometheusHandle> {
    let handle = builder()?
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("failed to install Prometheus metrics recorder: {e}"))?;

    metrics::describe_counter!(SCRAPES_TOTAL, "UPS scrapes handled, by outcome");
    metrics::describe_histogram!(
        SCRAPE_DURATION_SECONDS,
        metrics::Unit::Seconds,
        "Wall time of a UPS scrape including rendering"
    );
    metrics::describe_counter!(
        REJECTED_REQUESTS_TOTAL,
        "Scrape requests refused for bad target or port parameters"
    );

    Ok(handle)
}

pub fn record_scrape(outcome: &'static str, elapsed: Duration) {
    metrics::counter!(SCRAPES_TOTAL, "outcome" => outcome).increment(1);
    metrics::histogram!(SCRAPE_DURATION_SECONDS, "outcome" => outcome).record(elapsed.as_secs_f64());
}

pub fn record_rejected() {
    metrics::counter!(REJECTED_REQUESTS_TOTAL).increment(1);
}

pub async fn metrics_handler(State(state): State<AppState>) -> String {
    state.metrics.render()
}
