//! Relay subsystem.
//!
//! # Data Flow
//! ```text
//! IngressHandler picks next member
//!     → forwarder.rs (spawn detached task)
//!     → message.rs (serialize {original_text, modified_text})
//!     → POST to next member's message URL with trace headers
//!     → log outcome, close span
//! ```

pub mod forwarder;
pub mod message;

pub use forwarder::{Relay, RelayError};
pub use message::Message;
