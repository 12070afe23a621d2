//! Ollama provider (`POST /api/generate`).

use async_trait::async_trait;
use opentelemetry::Context;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::transform::{clean_reply, http_client, traced_generate, TransformError, Transformer, PROMPT};

const PROVIDER: &str = "ollama";

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Transformer backed by a local Ollama server.
pub struct OllamaTransformer {
    client: reqwest::Client,
    endpoint: String,
    model: String,
}

impl OllamaTransformer {
    pub fn new(base_url: &str, model: &str, timeout: Duration) -> Result<Self, TransformError> {
        Ok(Self {
            client: http_client(PROVIDER, timeout)?,
            endpoint: format!("{}/api/generate", base_url.trim_end_matches('/')),
            model: model.to_string(),
        })
    }
}

#[async_trait]
impl Transformer for OllamaTransformer {
    async fn transform(&self, cx: &Context, text: &str) -> Result<String, TransformError> {
        let request = GenerateRequest {
            model: &self.model,
            prompt: format!("{}{}", PROMPT, text),
            stream: false,
        };

        traced_generate(cx, PROVIDER, &self.model, |headers| async move {
            let reply: GenerateResponse = self
                .client
                .post(&self.endpoint)
                .headers(headers)
                .json(&request)
                .send()
                .await
                .and_then(|r| r.error_for_status())
                .map_err(|source| TransformError::Request { provider: PROVIDER, source })?
                .json()
                .await
                .map_err(|e| TransformError::Response {
                    provider: PROVIDER,
                    detail: e.to_string(),
                })?;

            clean_reply(PROVIDER, &reply.response)
        })
        .await
    }
}
