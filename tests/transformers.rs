//! LLM providers against mock HTTP backends.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use opentelemetry::Context;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use telephone::transform::{
    GeminiTransformer, OllamaTransformer, TransformError, Transformer, PROMPT,
};

mod common;

type Seen = Arc<Mutex<Vec<Value>>>;

async fn ollama_generate(State(seen): State<Seen>, Json(body): Json<Value>) -> Json<Value> {
    seen.lock().unwrap().push(body);
    Json(json!({ "model": "llama3.2", "response": "  \"Hello, whirled!\"\n", "done": true }))
}

async fn gemini_generate(
    State(seen): State<Seen>,
    Path(model): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if headers.get("x-goog-api-key").map(|v| v.as_bytes()) != Some(b"secret") {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "bad key" })));
    }
    seen.lock().unwrap().push(json!({ "model": model, "body": body }));
    (
        StatusCode::OK,
        Json(json!({
            "candidates": [{ "content": { "parts": [{ "text": "Hello, world." }] } }]
        })),
    )
}

#[tokio::test]
async fn test_ollama_sends_prompt_and_cleans_reply() {
    let seen: Seen = Arc::default();
    let app = Router::new()
        .route("/api/generate", post(ollama_generate))
        .with_state(seen.clone());
    let addr = common::serve(app).await;

    let transformer =
        OllamaTransformer::new(&format!("http://{}/", addr), "llama3.2", Duration::from_secs(2))
            .unwrap();
    let reply = transformer
        .transform(&Context::new(), "Hello, world!")
        .await
        .unwrap();
    assert_eq!(reply, "Hello, whirled!");

    let request = seen.lock().unwrap()[0].clone();
    assert_eq!(request["model"], "llama3.2");
    assert_eq!(request["stream"], false);
    assert_eq!(request["prompt"], format!("{}Hello, world!", PROMPT));
}

#[tokio::test]
async fn test_ollama_error_status_is_request_error() {
    let app = Router::new().route(
        "/api/generate",
        post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let addr = common::serve(app).await;

    let transformer =
        OllamaTransformer::new(&format!("http://{}", addr), "llama3.2", Duration::from_secs(2))
            .unwrap();
    let result = transformer.transform(&Context::new(), "hi").await;
    assert!(matches!(result, Err(TransformError::Request { provider: "ollama", .. })));
}

#[tokio::test]
async fn test_gemini_uses_model_path_and_key_header() {
    let seen: Seen = Arc::default();
    let app = Router::new()
        .route("/v1beta/models/{model}", post(gemini_generate))
        .with_state(seen.clone());
    let addr = common::serve(app).await;

    let transformer =
        GeminiTransformer::new("gemini-2.0-flash", "secret".into(), Duration::from_secs(2))
            .unwrap()
            .with_base_url(&format!("http://{}/v1beta", addr));
    let reply = transformer.transform(&Context::new(), "Hello").await.unwrap();
    assert_eq!(reply, "Hello, world.");

    let request = seen.lock().unwrap()[0].clone();
    assert_eq!(request["model"], "gemini-2.0-flash:generateContent");
    assert_eq!(
        request["body"]["contents"][0]["parts"][0]["text"],
        format!("{}Hello", PROMPT)
    );
}

#[tokio::test]
async fn test_gemini_rejected_key_is_error() {
    let seen: Seen = Arc::default();
    let app = Router::new()
        .route("/v1beta/models/{model}", post(gemini_generate))
        .with_state(seen);
    let addr = common::serve(app).await;

    let transformer =
        GeminiTransformer::new("gemini-2.0-flash", "wrong".into(), Duration::from_secs(2))
            .unwrap()
            .with_base_url(&format!("http://{}/v1beta", addr));
    let result = transformer.transform(&Context::new(), "Hello").await;
    assert!(matches!(result, Err(TransformError::Request { provider: "gemini", .. })));
}
