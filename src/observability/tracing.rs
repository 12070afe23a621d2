//! Distributed tracing support.
//!
//! # Responsibilities
//! - Install the OpenTelemetry tracer provider and W3C propagator
//! - Extract trace context from incoming requests
//! - Propagate trace context to outbound relay and LLM requests
//!
//! # Design Decisions
//! - Spans are always created; export only happens when an OTLP endpoint is set
//! - W3C Trace Context headers (`traceparent`, `tracestate`)

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use opentelemetry::global::{self, BoxedTracer};
use opentelemetry::propagation::{Extractor, Injector};
use opentelemetry::{Context, KeyValue};
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::trace::SdkTracerProvider;
use opentelemetry_sdk::Resource;

use crate::config::ObservabilityConfig;

/// Instrumentation scope name for every span this crate creates.
pub const TRACER_NAME: &str = "telephone";

/// Error type for telemetry setup.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("failed to build span exporter: {0}")]
    Exporter(String),
}

/// Install the W3C trace-context propagator globally.
pub fn install_propagator() {
    global::set_text_map_propagator(TraceContextPropagator::new());
}

/// Build the tracer provider, register it globally and return it so the
/// caller can flush it on shutdown.
pub fn init_tracer(config: &ObservabilityConfig) -> Result<SdkTracerProvider, TelemetryError> {
    install_propagator();

    let resource = Resource::builder()
        .with_service_name(config.service_name.clone())
        .with_attributes([
            KeyValue::new("deployment.environment", config.environment.clone()),
            KeyValue::new("service.version", config.service_version.clone()),
        ])
        .build();

    let mut builder = SdkTracerProvider::builder().with_resource(resource);

    if let Some(endpoint) = &config.otlp_endpoint {
        builder = with_otlp_exporter(builder, endpoint)?;
        tracing::info!(endpoint = %endpoint, "Exporting spans over OTLP");
    }

    let provider = builder.build();
    global::set_tracer_provider(provider.clone());
    Ok(provider)
}

#[cfg(feature = "otlp")]
fn with_otlp_exporter(
    builder: opentelemetry_sdk::trace::TracerProviderBuilder,
    endpoint: &str,
) -> Result<opentelemetry_sdk::trace::TracerProviderBuilder, TelemetryError> {
    use opentelemetry_otlp::WithExportConfig;

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()
        .map_err(|e| TelemetryError::Exporter(e.to_string()))?;

    Ok(builder.with_batch_exporter(exporter))
}

#[cfg(not(feature = "otlp"))]
fn with_otlp_exporter(
    builder: opentelemetry_sdk::trace::TracerProviderBuilder,
    endpoint: &str,
) -> Result<opentelemetry_sdk::trace::TracerProviderBuilder, TelemetryError> {
    tracing::warn!(endpoint = %endpoint, "Built without the `otlp` feature; spans will not be exported");
    Ok(builder)
}

/// Flush pending spans and stop the provider.
pub fn shutdown_tracer(provider: &SdkTracerProvider) {
    if let Err(e) = provider.shutdown() {
        tracing::warn!(error = %e, "Tracer provider shutdown failed");
    }
}

/// The crate's tracer from the global provider.
pub fn tracer() -> BoxedTracer {
    global::tracer(TRACER_NAME)
}

/// Read a parent context from request headers.
pub fn extract_context(headers: &HeaderMap) -> Context {
    global::get_text_map_propagator(|propagator| propagator.extract(&HeaderExtractor(headers)))
}

/// Write `cx` into outbound request headers.
pub fn inject_context(cx: &Context, headers: &mut HeaderMap) {
    global::get_text_map_propagator(|propagator| {
        propagator.inject_context(cx, &mut HeaderInjector(headers))
    });
}

/// Adapter reading propagation fields from an HTTP header map.
pub struct HeaderExtractor<'a>(pub &'a HeaderMap);

impl Extractor for HeaderExtractor<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.to_str().ok())
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(|k| k.as_str()).collect()
    }
}

/// Adapter writing propagation fields into an HTTP header map.
pub struct HeaderInjector<'a>(pub &'a mut HeaderMap);

impl Injector for HeaderInjector<'_> {
    fn set(&mut self, key: &str, value: String) {
        let name = HeaderName::from_bytes(key.as_bytes());
        let value = HeaderValue::from_str(&value);
        if let (Ok(name), Ok(value)) = (name, value) {
            self.0.insert(name, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opentelemetry::trace::{
        SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState,
    };

    const PARENT: &str = "00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01";

    #[test]
    fn test_extract_reads_traceparent() {
        install_propagator();
        let mut headers = HeaderMap::new();
        headers.insert("traceparent", HeaderValue::from_static(PARENT));

        let cx = extract_context(&headers);
        let span = cx.span();
        let sc = span.span_context();
        assert!(sc.is_valid());
        assert!(sc.is_remote());
        assert_eq!(sc.trace_id().to_string(), "4bf92f3577b34da6a3ce929d0e0e4736");
    }

    #[test]
    fn test_extract_without_headers_is_empty() {
        install_propagator();
        let cx = extract_context(&HeaderMap::new());
        assert!(!cx.span().span_context().is_valid());
    }

    #[test]
    fn test_inject_writes_traceparent() {
        install_propagator();
        let sc = SpanContext::new(
            TraceId::from_hex("4bf92f3577b34da6a3ce929d0e0e4736").unwrap(),
            SpanId::from_hex("00f067aa0ba902b7").unwrap(),
            TraceFlags::SAMPLED,
            false,
            TraceState::default(),
        );
        let cx = Context::new().with_remote_span_context(sc);

        let mut headers = HeaderMap::new();
        inject_context(&cx, &mut headers);
        assert_eq!(headers.get("traceparent").unwrap(), PARENT);
    }
}
