//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the message and health handlers
//! - Wire up middleware (tracing, request ID, body limit, health timeout)
//! - Build the ring components (registry, selector, relay, ingress)
//! - Bind server to listener and drain on shutdown

use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::Request,
    routing::{get, post, MethodRouter},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::TelephoneConfig;
use crate::health::HealthProbe;
use crate::http::ingress::{health, method_not_allowed, receive_message, IngressHandler};
use crate::http::request::{request_id_of, UuidRequestId};
use crate::lifecycle::Shutdown;
use crate::relay::Relay;
use crate::rotation::{HostRegistry, IdentityResolver, RegistryError, RotationSelector};
use crate::transform::Transformer;

/// External capabilities a node depends on.
///
/// Production wires hostname resolution, HTTP probes and an LLM; tests
/// substitute fakes.
#[derive(Clone)]
pub struct Collaborators {
    pub identity: Arc<dyn IdentityResolver>,
    pub probe: Arc<dyn HealthProbe>,
    pub transformer: Arc<dyn Transformer>,
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub ingress: Arc<IngressHandler>,
}

/// HTTP server for a ring node.
pub struct HttpServer {
    router: Router,
    config: TelephoneConfig,
    registry: Arc<HostRegistry>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(
        config: TelephoneConfig,
        collaborators: Collaborators,
        shutdown: Arc<Shutdown>,
    ) -> Result<Self, RegistryError> {
        let registry = Arc::new(HostRegistry::from_config(&config.ring.members)?);
        let selector = RotationSelector::new(registry.clone(), collaborators.probe);
        let relay = Relay::new(&config.relay, shutdown);
        let ingress = Arc::new(IngressHandler::new(
            collaborators.transformer,
            collaborators.identity,
            selector,
            relay,
        ));

        tracing::info!(
            ring = ?registry.identities().collect::<Vec<_>>(),
            head = %registry.head(),
            "Ring configured"
        );

        let state = AppState { ingress };
        let router = Self::build_router(&config, state);

        Ok(Self {
            router,
            config,
            registry,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &TelephoneConfig, state: AppState) -> Router {
        let message_route = || -> MethodRouter<AppState> {
            post(receive_message).fallback(method_not_allowed)
        };

        // Hops are bounded by the transformer and probe deadlines; only
        // health requests carry the request timeout.
        let health_routes = Router::new()
            .route("/health", get(health))
            .route("/api/v1/health", get(health))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)));

        Router::new()
            .route("/message", message_route())
            .route("/api/v1/message", message_route())
            .merge(health_routes)
            .with_state(state)
            .layer(DefaultBodyLimit::max(config.limits.max_body_bytes))
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
                    .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                        tracing::info_span!(
                            "request",
                            method = %request.method(),
                            path = %request.uri().path(),
                            request_id = %request_id_of(request),
                        )
                    }))
                    .layer(PropagateRequestIdLayer::x_request_id()),
            )
    }

    /// The configured router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            members = self.registry.len(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &TelephoneConfig {
        &self.config
    }

    /// The ring this node serves.
    pub fn registry(&self) -> &HostRegistry {
        &self.registry
    }
}
