//! Message ingress.
//!
//! # Responsibilities
//! - Decode the inbound message (400 on failure)
//! - Transform the right input text for this hop
//! - Tag the `receive-message` span with original/modified text
//! - Select the next member and hand off to the relay without waiting
//! - Acknowledge immediately
//!
//! # Design Decisions
//! - The acknowledgment never reflects relay success; relaying is detached
//! - A failing transformer does not stop the ring: the input is passed on

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use opentelemetry::trace::{SpanKind, TraceContextExt, Tracer};
use opentelemetry::{Context, KeyValue};
use std::sync::Arc;
use tokio::task::JoinHandle;
use url::Url;

use crate::http::server::AppState;
use crate::observability::metrics::{self, HopKind};
use crate::observability::tracing as telemetry;
use crate::relay::{Message, Relay};
use crate::rotation::{IdentityResolver, RotationSelector, Selection};
use crate::transform::Transformer;

/// Body returned for every accepted message.
pub const ACK: &str = "Message received and forwarded (maybe)";

/// Body returned by the health endpoint.
pub const HEALTH_OK: &str = "OK";

/// What a hop did with the message after transforming it.
#[derive(Debug)]
pub enum HopOutcome {
    /// A relay task was spawned towards `next`.
    Forwarded {
        next: String,
        url: Url,
        relay: JoinHandle<()>,
    },
    /// The next member would have been the ring head.
    RingComplete,
}

/// Per-hop orchestration: transform, select, relay.
pub struct IngressHandler {
    transformer: Arc<dyn Transformer>,
    identity: Arc<dyn IdentityResolver>,
    selector: RotationSelector,
    relay: Relay,
}

impl IngressHandler {
    pub fn new(
        transformer: Arc<dyn Transformer>,
        identity: Arc<dyn IdentityResolver>,
        selector: RotationSelector,
        relay: Relay,
    ) -> Self {
        Self {
            transformer,
            identity,
            selector,
            relay,
        }
    }

    /// Process one hop inside the span carried by `cx`.
    pub async fn handle(&self, cx: &Context, message: Message) -> HopOutcome {
        let first_hop = message.is_first_hop();
        metrics::record_message_received(if first_hop { HopKind::First } else { HopKind::Relay });

        let input = message.transform_input();
        let modified = match self.transformer.transform(cx, input).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "Transformer failed, passing text on unchanged");
                input.to_string()
            }
        };

        if first_hop {
            tracing::info!(
                original_message = %message.original_text,
                modified_message = %modified,
                "First host - processing message"
            );
        } else {
            tracing::info!(
                original_message = %message.original_text,
                previous_modified = %message.modified_text,
                new_modified_message = %modified,
                "Processing message"
            );
        }

        {
            let span = cx.span();
            span.set_attribute(KeyValue::new("original.message", message.original_text.clone()));
            span.set_attribute(KeyValue::new("modified.message", modified.clone()));
        }

        let own_identity = self.identity.resolve();
        match self.selector.next_host(own_identity.as_deref()).await {
            Selection::Next(member) => {
                let url = member.message_url.clone();
                let outbound = Message::new(message.original_text, modified);
                let relay = self.relay.spawn(cx.clone(), outbound, url.clone());
                tracing::debug!(next = %member, url = %url, "Relay dispatched");
                HopOutcome::Forwarded {
                    next: member.identity.clone(),
                    url,
                    relay,
                }
            }
            Selection::RingComplete => {
                tracing::info!("End of the line. Ring complete, not forwarding");
                metrics::record_ring_complete();
                HopOutcome::RingComplete
            }
        }
    }
}

/// `POST /message`
pub async fn receive_message(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let message: Message = match serde_json::from_slice(&body) {
        Ok(message) => message,
        Err(e) => {
            tracing::warn!(error = %e, "Rejecting undecodable message");
            return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
        }
    };

    let parent = telemetry::extract_context(&headers);
    let tracer = telemetry::tracer();
    let span = tracer
        .span_builder("receive-message")
        .with_kind(SpanKind::Server)
        .start_with_context(&tracer, &parent);
    let cx = parent.with_span(span);

    // The relay handle is dropped: the task keeps running detached.
    let _ = state.ingress.handle(&cx, message).await;
    cx.span().end();

    (StatusCode::OK, ACK).into_response()
}

/// Any method other than POST on a message route.
pub async fn method_not_allowed() -> impl IntoResponse {
    (StatusCode::METHOD_NOT_ALLOWED, "Only POST method is accepted")
}

/// `GET /health`
pub async fn health() -> &'static str {
    HEALTH_OK
}
