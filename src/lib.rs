//! Telephone ring relay.
//!
//! Each node receives a short message, transforms it, and forwards the
//! result to the next healthy member of a fixed ring until the message
//! comes back around to the ring head.

pub mod config;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod relay;
pub mod resilience;
pub mod rotation;
pub mod transform;

pub use config::TelephoneConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
