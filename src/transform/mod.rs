//! Text transformation.
//!
//! Each hop "mishears" the message before passing it on. The transformer
//! is an injected capability; the node picks a provider from config.

pub mod gemini;
pub mod ollama;
pub mod scramble;

use async_trait::async_trait;
use axum::http::HeaderMap;
use opentelemetry::trace::{SpanKind, Status, TraceContextExt, Tracer};
use opentelemetry::{Context, KeyValue};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{TransformerConfig, TransformerProvider};
use crate::observability::tracing as telemetry;

pub use gemini::GeminiTransformer;
pub use ollama::OllamaTransformer;
pub use scramble::ScrambleTransformer;

/// Prompt sent to LLM providers; the text is appended after it.
pub const PROMPT: &str = "You are playing the game of telephone. Repeat the following \
sentence back with one or two small changes, as if you had slightly misheard it. \
Reply with only the new sentence and nothing else.\n\nSentence: ";

/// Error type for a transformation.
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    #[error("request to {provider} failed: {source}")]
    Request {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} returned an unexpected response: {detail}")]
    Response {
        provider: &'static str,
        detail: String,
    },

    #[error("missing API key: environment variable {0} is not set")]
    MissingCredentials(String),

    #[error("{0} returned an empty reply")]
    Empty(&'static str),
}

/// Capability turning one hop's input into its output.
#[async_trait]
pub trait Transformer: Send + Sync {
    /// `cx` carries the active trace so providers can nest their own spans.
    async fn transform(&self, cx: &Context, text: &str) -> Result<String, TransformError>;
}

/// Build the configured provider.
pub fn build_transformer(
    config: &TransformerConfig,
) -> Result<Arc<dyn Transformer>, TransformError> {
    let timeout = Duration::from_secs(config.timeout_secs);
    let transformer: Arc<dyn Transformer> = match config.provider {
        TransformerProvider::Gemini => {
            let key = std::env::var(&config.gemini_api_key_env)
                .map_err(|_| TransformError::MissingCredentials(config.gemini_api_key_env.clone()))?;
            Arc::new(GeminiTransformer::new(&config.gemini_model, key, timeout)?)
        }
        TransformerProvider::Ollama => Arc::new(OllamaTransformer::new(
            &config.ollama_url,
            &config.ollama_model,
            timeout,
        )?),
        TransformerProvider::Scramble => Arc::new(ScrambleTransformer),
    };

    tracing::info!(provider = %config.provider, "Using LLM provider");
    Ok(transformer)
}

/// Shared HTTP client for LLM providers.
pub(crate) fn http_client(
    provider: &'static str,
    timeout: Duration,
) -> Result<reqwest::Client, TransformError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|source| TransformError::Request { provider, source })
}

/// Run one LLM call inside an `llm.generate` span.
///
/// `call` receives headers carrying the span's trace context.
pub(crate) async fn traced_generate<F, Fut>(
    cx: &Context,
    provider: &'static str,
    model: &str,
    call: F,
) -> Result<String, TransformError>
where
    F: FnOnce(HeaderMap) -> Fut,
    Fut: Future<Output = Result<String, TransformError>>,
{
    let tracer = telemetry::tracer();
    let span = tracer
        .span_builder("llm.generate")
        .with_kind(SpanKind::Client)
        .with_attributes([
            KeyValue::new("llm.provider", provider),
            KeyValue::new("llm.model", model.to_string()),
        ])
        .start_with_context(&tracer, cx);
    let cx = cx.with_span(span);

    let mut headers = HeaderMap::new();
    telemetry::inject_context(&cx, &mut headers);

    let result = call(headers).await;
    if let Err(e) = &result {
        cx.span().set_status(Status::error(e.to_string()));
    }
    cx.span().end();
    result
}

/// Trim the model reply and reject empty output.
pub(crate) fn clean_reply(provider: &'static str, reply: &str) -> Result<String, TransformError> {
    let cleaned = reply.trim().trim_matches('"').trim();
    if cleaned.is_empty() {
        return Err(TransformError::Empty(provider));
    }
    Ok(cleaned.to_string())
}
