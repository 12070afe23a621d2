//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Call to a peer (health probe or relay):
//!     → timeouts.rs (enforce deadline)
//!     → On failure: logged and dropped, never retried
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every peer call has a deadline
//! - No retries: a failed probe means "not currently available",
//!   a failed relay ends that hop

pub mod timeouts;

pub use timeouts::{with_deadline, Elapsed};
