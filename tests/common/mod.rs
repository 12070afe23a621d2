//! Shared utilities for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Router,
};
use std::collections::HashSet;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use telephone::config::{MemberConfig, TelephoneConfig};
use telephone::health::HealthProbe;
use telephone::relay::Message;
use telephone::rotation::Member;
use telephone::transform::{TransformError, Transformer};

/// Start a programmable raw-HTTP backend on an ephemeral port.
///
/// `f` decides the status and body of every response and may sleep to
/// simulate a slow peer.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let (status, body) = f().await;
                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// An address nothing is listening on.
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// A message received by a capture peer.
#[derive(Debug)]
pub struct Captured {
    pub message: Message,
    pub headers: HeaderMap,
}

#[derive(Clone)]
struct PeerState {
    tx: mpsc::UnboundedSender<Captured>,
    delay: Duration,
    status: StatusCode,
}

async fn capture(State(state): State<PeerState>, headers: HeaderMap, body: Bytes) -> StatusCode {
    let message: Message = serde_json::from_slice(&body).expect("peer received invalid JSON");
    let _ = state.tx.send(Captured { message, headers });
    tokio::time::sleep(state.delay).await;
    state.status
}

/// Start a peer that records every message POSTed to `/message`.
pub async fn start_capture_peer(
    status: StatusCode,
    delay: Duration,
) -> (SocketAddr, mpsc::UnboundedReceiver<Captured>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let app = Router::new()
        .route("/message", post(capture))
        .with_state(PeerState { tx, delay, status });

    (serve(app).await, rx)
}

/// Serve `app` on an ephemeral port.
pub async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// Wait for the next captured message, failing after `secs`.
pub async fn next_captured(rx: &mut mpsc::UnboundedReceiver<Captured>, secs: u64) -> Captured {
    tokio::time::timeout(Duration::from_secs(secs), rx.recv())
        .await
        .expect("timed out waiting for relayed message")
        .expect("capture channel closed")
}

/// Ring member config pointing at `addr`.
pub fn member_at(identity: &str, addr: SocketAddr) -> MemberConfig {
    MemberConfig {
        identity: identity.to_string(),
        message_url: format!("http://{}/message", addr),
        health_url: format!("http://{}/health", addr),
    }
}

/// Default config with the given ring and short timeouts.
pub fn ring_config(members: Vec<MemberConfig>) -> TelephoneConfig {
    let mut config = TelephoneConfig::default();
    config.ring.members = members;
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.health_check.timeout_secs = 1;
    config.relay.timeout_secs = 2;
    config
}

/// Appends a fixed suffix and records every input it sees.
#[derive(Default)]
pub struct SuffixTransformer {
    pub suffix: String,
    pub inputs: Mutex<Vec<String>>,
}

impl SuffixTransformer {
    pub fn new(suffix: &str) -> Arc<Self> {
        Arc::new(Self {
            suffix: suffix.to_string(),
            inputs: Mutex::default(),
        })
    }

    pub fn inputs(&self) -> Vec<String> {
        self.inputs.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transformer for SuffixTransformer {
    async fn transform(
        &self,
        _cx: &opentelemetry::Context,
        text: &str,
    ) -> Result<String, TransformError> {
        self.inputs.lock().unwrap().push(text.to_string());
        Ok(format!("{}{}", text, self.suffix))
    }
}

/// Always fails.
pub struct FailingTransformer;

#[async_trait]
impl Transformer for FailingTransformer {
    async fn transform(
        &self,
        _cx: &opentelemetry::Context,
        _text: &str,
    ) -> Result<String, TransformError> {
        Err(TransformError::Empty("test"))
    }
}

/// Reports every member healthy except those listed.
#[derive(Default)]
pub struct FakeProbe {
    pub down: HashSet<String>,
}

impl FakeProbe {
    pub fn healthy() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

#[async_trait]
impl HealthProbe for FakeProbe {
    async fn is_healthy(&self, member: &Member) -> bool {
        !self.down.contains(&member.identity)
    }
}
