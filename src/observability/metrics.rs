//! Metrics collection and exposition.
//!
//! # Metrics
//! - `hook_triggers_total` (counter): triggers by outcome
//!   (`deployed`, `unauthorized`, `not_found`, `deploy_failed`)
//! - `hook_deploy_duration_seconds` (histogram): deploy command wall time
//!   by project, environment and success
//!
//! Without an installed recorder every call here is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the global recorder and start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint started");
    Ok(())
}

pub fn record_trigger(outcome: &'static str) {
    metrics::counter!("hook_triggers_total", "outcome" => outcome).increment(1);
}

pub fn record_deploy(project: &str, environment: &str, succeeded: bool, start: Instant) {
    let succeeded = if succeeded { "true" } else { "false" };
    metrics::histogram!(
        "hook_deploy_duration_seconds",
        "project" => project.to_string(),
        "environment" => environment.to_string(),
        "succeeded" => succeeded
    )
    .record(start.elapsed().as_secs_f64());
}
