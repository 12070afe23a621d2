//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID)
//!     → ingress.rs (decode, transform, select next member, spawn relay)
//!     → 200 acknowledgment, before the relay finishes
//! ```

pub mod ingress;
pub mod request;
pub mod server;

pub use ingress::{HopOutcome, IngressHandler, ACK, HEALTH_OK};
pub use request::{UuidRequestId, X_REQUEST_ID};
pub use server::{AppState, Collaborators, HttpServer};
