//! Metrics collection and exposition.
//!
//! # Metrics
//! - `telephone_messages_received_total` (counter): inbound messages by hop kind
//! - `telephone_health_probes_total` (counter): probe results by member
//! - `telephone_relays_total` (counter): relay outcomes
//! - `telephone_relay_duration_seconds` (histogram): outbound POST latency
//! - `telephone_ring_complete_total` (counter): cycles ended at this node

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and its scrape listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Which hop an inbound message represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HopKind {
    First,
    Relay,
}

impl HopKind {
    pub fn as_str(self) -> &'static str {
        match self {
            HopKind::First => "first",
            HopKind::Relay => "relay",
        }
    }
}

pub fn record_message_received(hop: HopKind) {
    counter!("telephone_messages_received_total", "hop" => hop.as_str()).increment(1);
}

pub fn record_probe(member: &str, healthy: bool) {
    counter!(
        "telephone_health_probes_total",
        "member" => member.to_string(),
        "healthy" => if healthy { "true" } else { "false" }
    )
    .increment(1);
}

pub fn record_relay(outcome: &'static str, start: Instant) {
    counter!("telephone_relays_total", "outcome" => outcome).increment(1);
    histogram!("telephone_relay_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_ring_complete() {
    counter!("telephone_ring_complete_total").increment(1);
}
