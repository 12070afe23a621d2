//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize, PORT override)
//!     → validation.rs (semantic checks)
//!     → TelephoneConfig (validated, immutable)
//!     → HostRegistry built once, shared via Arc
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; ring membership never changes at runtime
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    HealthCheckConfig, ListenerConfig, LogFormat, MemberConfig, ObservabilityConfig, RelayConfig,
    RingConfig, TelephoneConfig, TransformerConfig, TransformerProvider,
};
