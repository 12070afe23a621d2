//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for a ring node.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for a telephone node.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TelephoneConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Ring membership, in rotation order.
    pub ring: RingConfig,

    /// Peer health probe settings.
    pub health_check: HealthCheckConfig,

    /// Outbound relay settings.
    pub relay: RelayConfig,

    /// Inbound timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Inbound request limits.
    pub limits: LimitsConfig,

    /// Text transformer settings.
    pub transformer: TransformerConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// The fixed ring of participating nodes.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RingConfig {
    /// Members in ring order. The first entry is the ring head.
    pub members: Vec<MemberConfig>,
}

impl Default for RingConfig {
    fn default() -> Self {
        let members = (0..5)
            .map(|n| MemberConfig {
                identity: format!("tele{}", n),
                message_url: format!("http://tele{n}:808{n}/api/v1/message"),
                health_url: format!("http://tele{n}:808{n}/api/v1/health"),
            })
            .collect();
        Self { members }
    }
}

/// A single ring member as written in the config file.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct MemberConfig {
    /// Node identity, matched against the runtime hostname.
    pub identity: String,

    /// URL that accepts relayed messages.
    pub message_url: String,

    /// URL answering liveness probes.
    pub health_url: String,
}

/// Health probe configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthCheckConfig {
    /// Probe timeout in seconds (connect + response).
    pub timeout_secs: u64,
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self { timeout_secs: 5 }
    }
}

/// Relay configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Deadline for the outbound POST in seconds.
    pub timeout_secs: u64,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self { timeout_secs: 10 }
    }
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Deadline for health requests in seconds. Message hops are bounded
    /// by the transformer and probe timeouts instead.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 10 }
    }
}

/// Inbound request limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum accepted body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 64 * 1024,
        }
    }
}

/// Which backend performs the text transformation.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransformerProvider {
    #[default]
    Gemini,
    Ollama,
    Scramble,
}

impl std::str::FromStr for TransformerProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "ollama" => Ok(Self::Ollama),
            "scramble" => Ok(Self::Scramble),
            other => Err(format!("unknown transformer provider '{}'", other)),
        }
    }
}

impl std::fmt::Display for TransformerProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Gemini => "gemini",
            Self::Ollama => "ollama",
            Self::Scramble => "scramble",
        };
        f.write_str(name)
    }
}

/// Text transformer configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TransformerConfig {
    /// Selected provider.
    pub provider: TransformerProvider,

    /// Base URL of the Ollama server.
    pub ollama_url: String,

    /// Ollama model name.
    pub ollama_model: String,

    /// Gemini model name.
    pub gemini_model: String,

    /// Environment variable holding the Gemini API key.
    pub gemini_api_key_env: String,

    /// LLM call timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for TransformerConfig {
    fn default() -> Self {
        Self {
            provider: TransformerProvider::default(),
            ollama_url: "http://localhost:11434".to_string(),
            ollama_model: "llama3.2".to_string(),
            gemini_model: "gemini-2.0-flash".to_string(),
            gemini_api_key_env: "GEMINI_API_KEY".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Service name reported on spans.
    pub service_name: String,

    /// Deployment environment tag.
    pub environment: String,

    /// Service version tag.
    pub service_version: String,

    /// OTLP collector endpoint. Spans are not exported when unset.
    pub otlp_endpoint: Option<String>,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::default(),
            service_name: "dd-telephone".to_string(),
            environment: "dev".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            otlp_endpoint: None,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
