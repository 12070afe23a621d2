//! Asynchronous message forwarding.
//!
//! # Responsibilities
//! - Serialize the message and POST it to the next member
//! - Inject the current trace context into the outbound headers
//! - Bound the call with the relay timeout
//! - Record outcome on the `forward-message` span
//!
//! # Design Decisions
//! - Fire-and-forget: the caller never awaits the spawned task
//! - No retries; every failure is logged and the hop ends there
//! - The task owns copies of everything it needs and observes shutdown

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use hyper::{body::Incoming, Response};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use opentelemetry::trace::{SpanKind, Status, TraceContextExt, Tracer};
use opentelemetry::{Context, KeyValue};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use url::Url;

use crate::config::RelayConfig;
use crate::lifecycle::Shutdown;
use crate::observability::{metrics, tracing as telemetry};
use crate::relay::message::Message;
use crate::resilience::{with_deadline, Elapsed};

/// Error type for a single relay attempt.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("failed to serialize message: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to build request: {0}")]
    Request(#[from] axum::http::Error),

    #[error("transport error: {0}")]
    Transport(#[from] hyper_util::client::legacy::Error),

    #[error("relay {0}")]
    Timeout(#[from] Elapsed),

    #[error("next member answered {0}")]
    Status(StatusCode),
}

impl RelayError {
    fn outcome(&self) -> &'static str {
        match self {
            RelayError::Serialize(_) | RelayError::Request(_) => "invalid",
            RelayError::Transport(_) => "transport_error",
            RelayError::Timeout(_) => "timeout",
            RelayError::Status(_) => "rejected",
        }
    }
}

/// Forwards messages to the next ring member.
#[derive(Clone)]
pub struct Relay {
    client: Client<HttpConnector, Body>,
    timeout: Duration,
    shutdown: Arc<Shutdown>,
}

impl Relay {
    pub fn new(config: &RelayConfig, shutdown: Arc<Shutdown>) -> Self {
        let timeout = Duration::from_secs(config.timeout_secs);
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(timeout));
        let client = Client::builder(TokioExecutor::new()).build(connector);

        Self {
            client,
            timeout,
            shutdown,
        }
    }

    /// Forward on a detached task.
    ///
    /// The returned handle may be dropped; the task runs to completion (or
    /// until shutdown) either way.
    pub fn spawn(&self, parent: Context, message: Message, target: Url) -> JoinHandle<()> {
        let relay = self.clone();
        let mut shutdown = self.shutdown.subscribe();
        let already_stopping = self.shutdown.is_triggered();

        tokio::spawn(async move {
            if already_stopping {
                tracing::warn!(url = %target, "Shutdown in progress, relay not started");
                return;
            }

            let start = Instant::now();
            let cx = start_span(&parent);
            tokio::select! {
                _ = relay.deliver(&cx, &message, &target) => {}
                Ok(()) = shutdown.recv() => {
                    tracing::warn!(url = %target, "Relay cancelled by shutdown");
                    let span = cx.span();
                    span.set_attribute(KeyValue::new("forward.url", target.to_string()));
                    span.set_status(Status::error("cancelled by shutdown"));
                    span.end();
                    metrics::record_relay("cancelled", start);
                }
            }
        })
    }

    /// Forward inside a `forward-message` span that is a child of `parent`.
    pub async fn forward(
        &self,
        parent: Context,
        message: Message,
        target: Url,
    ) -> Result<StatusCode, RelayError> {
        let cx = start_span(&parent);
        self.deliver(&cx, &message, &target).await
    }

    /// Send and record the outcome on the span in `cx`, then end it.
    async fn deliver(
        &self,
        cx: &Context,
        message: &Message,
        target: &Url,
    ) -> Result<StatusCode, RelayError> {
        let start = Instant::now();
        let result = self.send(cx, message, target).await;

        let span = cx.span();
        span.set_attribute(KeyValue::new("forward.url", target.to_string()));
        match &result {
            Ok(status) => {
                tracing::info!(url = %target, status = %status, "Forwarded message");
                span.set_attribute(KeyValue::new("forward.status", status.to_string()));
                metrics::record_relay("success", start);
            }
            Err(e) => {
                tracing::error!(url = %target, error = %e, "Error forwarding message");
                if let RelayError::Status(status) = e {
                    span.set_attribute(KeyValue::new("forward.status", status.to_string()));
                }
                span.set_status(Status::error(e.to_string()));
                metrics::record_relay(e.outcome(), start);
            }
        }
        span.end();

        result
    }

    async fn send(
        &self,
        cx: &Context,
        message: &Message,
        target: &Url,
    ) -> Result<StatusCode, RelayError> {
        let body = serde_json::to_vec(message)?;

        let mut request = Request::builder()
            .method(Method::POST)
            .uri(target.as_str())
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))?;
        telemetry::inject_context(cx, request.headers_mut());

        let response: Response<Incoming> =
            with_deadline(self.timeout, self.client.request(request)).await??;
        let status = response.status();
        if !status.is_success() {
            return Err(RelayError::Status(status));
        }
        Ok(status)
    }
}

fn start_span(parent: &Context) -> Context {
    let tracer = telemetry::tracer();
    let span = tracer
        .span_builder("forward-message")
        .with_kind(SpanKind::Client)
        .start_with_context(&tracer, parent);
    parent.with_span(span)
}
