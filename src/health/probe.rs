//! Peer liveness probing.
//!
//! # Responsibilities
//! - GET a member's health endpoint with a bounded timeout
//! - Map the outcome to healthy / unhealthy
//!
//! # Design Decisions
//! - Single attempt, no retries, no caching across calls
//! - Any transport error, timeout or non-2xx status means unhealthy

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use std::time::Duration;

use crate::config::HealthCheckConfig;
use crate::observability::metrics;
use crate::resilience::with_deadline;
use crate::rotation::Member;

/// Capability answering "is this member reachable right now?".
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn is_healthy(&self, member: &Member) -> bool;
}

/// Probes members over HTTP.
#[derive(Clone)]
pub struct HttpHealthProbe {
    client: Client<HttpConnector, Body>,
    timeout: Duration,
}

impl HttpHealthProbe {
    pub fn new(config: &HealthCheckConfig) -> Self {
        Self::with_timeout(Duration::from_secs(config.timeout_secs))
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(timeout));
        let client = Client::builder(TokioExecutor::new()).build(connector);

        Self { client, timeout }
    }
}

#[async_trait]
impl HealthProbe for HttpHealthProbe {
    async fn is_healthy(&self, member: &Member) -> bool {
        let url = &member.health_url;
        let request = match Request::builder()
            .method(Method::GET)
            .uri(url.as_str())
            .header(header::USER_AGENT, "telephone-health-check")
            .body(Body::empty())
        {
            Ok(req) => req,
            Err(e) => {
                tracing::error!(member = %member, error = %e, "Failed to build health check request");
                metrics::record_probe(&member.identity, false);
                return false;
            }
        };

        let healthy = match with_deadline(self.timeout, self.client.request(request)).await {
            Ok(Ok(response)) => {
                let success = response.status().is_success();
                if !success {
                    tracing::warn!(member = %member, url = %url, status = %response.status(), "Health check failed: non-success status");
                }
                success
            }
            Ok(Err(e)) => {
                tracing::warn!(member = %member, url = %url, error = %e, "Health check failed: connection error");
                false
            }
            Err(elapsed) => {
                tracing::warn!(member = %member, url = %url, "Health check failed: {}", elapsed);
                false
            }
        };

        metrics::record_probe(&member.identity, healthy);
        healthy
    }
}
