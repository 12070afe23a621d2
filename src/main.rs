//! Telephone ring node.
//!
//! # Architecture Overview
//!
//! ```text
//!   previous member                       this node                                   next member
//!  ───────────────┐   ┌──────────────────────────────────────────────────────────┐   ┌──────────
//!   POST /message │──▶│ ingress ──▶ transform ──▶ rotation ──▶ relay (detached)  │──▶│ /message
//!                 │◀──│   └─ 200 ack (immediately)        │                      │   │
//!                 │   │                          health probes ──────────────────┼──▶│ /health
//!  ───────────────┘   └──────────────────────────────────────────────────────────┘   └──────────
//! ```
//!
//! A message enters at the ring head and travels member to member until the
//! next selected member would be the head again.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use telephone::config::{load_config, TransformerProvider};
use telephone::health::HttpHealthProbe;
use telephone::http::{Collaborators, HttpServer};
use telephone::lifecycle::{signals, Shutdown};
use telephone::observability::{logging, metrics, tracing as telemetry};
use telephone::rotation::HostnameResolver;
use telephone::transform::build_transformer;

#[derive(Parser)]
#[command(name = "telephone")]
#[command(about = "A node in the telephone ring", long_about = None)]
struct Args {
    /// Path to a TOML config file. Built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// LLM provider: gemini, ollama or scramble.
    #[arg(long)]
    llm: Option<TransformerProvider>,

    /// Port to listen on (overrides config and $PORT).
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = load_config(args.config.as_deref())?;
    if let Some(provider) = args.llm {
        config.transformer.provider = provider;
    }
    if let Some(port) = args.port {
        config.listener.bind_address = format!("0.0.0.0:{}", port);
    }

    logging::init_logging(&config.observability);
    tracing::info!("telephone v{} starting", env!("CARGO_PKG_VERSION"));

    let tracer_provider = telemetry::init_tracer(&config.observability)?;

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let collaborators = Collaborators {
        identity: Arc::new(HostnameResolver),
        probe: Arc::new(HttpHealthProbe::new(&config.health_check)),
        transformer: build_transformer(&config.transformer)?,
    };

    tracing::info!(
        bind_address = %config.listener.bind_address,
        members = config.ring.members.len(),
        relay_timeout_secs = config.relay.timeout_secs,
        probe_timeout_secs = config.health_check.timeout_secs,
        "Configuration loaded"
    );

    let shutdown = Arc::new(Shutdown::new());
    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = HttpServer::new(config, collaborators, shutdown.clone())?;

    let server_shutdown = shutdown.subscribe();
    signals::spawn_signal_listener(shutdown.clone());
    server.run(listener, server_shutdown).await?;

    telemetry::shutdown_tracer(&tracer_provider);
    tracing::info!("Shutdown complete");
    Ok(())
}
