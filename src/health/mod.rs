//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! RotationSelector scanning candidates
//!     → probe.rs (GET member health URL, bounded timeout)
//!     → healthy / unhealthy, decided fresh on every call
//! ```
//!
//! # Design Decisions
//! - Probes are on-demand, not periodic: there is no stored health state
//! - Probing is a trait so selection can be tested with deterministic fakes

pub mod probe;

pub use probe::{HealthProbe, HttpHealthProbe};
