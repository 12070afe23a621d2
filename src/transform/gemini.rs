//! Google Gemini provider (`models/{model}:generateContent`).

use async_trait::async_trait;
use opentelemetry::Context;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use crate::transform::{clean_reply, http_client, traced_generate, TransformError, Transformer, PROMPT};

const PROVIDER: &str = "gemini";
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateContentResponse {
    fn first_text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        Some(text)
    }
}

/// Transformer backed by the Gemini API.
pub struct GeminiTransformer {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiTransformer {
    pub fn new(model: &str, api_key: String, timeout: Duration) -> Result<Self, TransformError> {
        Ok(Self {
            client: http_client(PROVIDER, timeout)?,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: model.to_string(),
            api_key,
        })
    }

    /// Point at a different API root (e.g. a proxy).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl Transformer for GeminiTransformer {
    async fn transform(&self, cx: &Context, text: &str) -> Result<String, TransformError> {
        let body = json!({
            "contents": [{ "parts": [{ "text": format!("{}{}", PROMPT, text) }] }]
        });
        let endpoint = self.endpoint();

        traced_generate(cx, PROVIDER, &self.model, |headers| async move {
            let reply: GenerateContentResponse = self
                .client
                .post(&endpoint)
                .headers(headers)
                .header("x-goog-api-key", &self.api_key)
                .json(&body)
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

            let text = reply.first_text().ok_or_else(|| TransformError::Response {
                provider: PROVIDER,
                detail: "no candidates in reply".to_string(),
            })?;
            clean_reply(PROVIDER, &text)
        })
        .await
    }
}
