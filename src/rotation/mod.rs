//! Ring rotation subsystem.
//!
//! # Data Flow
//! ```text
//! Message transformed at this node
//!     → identity.rs (who am I? resolved per call)
//!     → registry.rs (ring order, endpoints, ring head)
//!     → selector.rs (scan successors, probe each via health::probe)
//!     → Return: next Member or RingComplete
//! ```
//!
//! # Design Decisions
//! - Selection is stateless; no cursor is stored between calls
//! - First healthy successor wins, no balancing among healthy members
//! - All members down still forwards to the immediate successor
//! - Identity and health are injected capabilities

pub mod identity;
pub mod member;
pub mod registry;
pub mod selector;

pub use identity::{HostnameResolver, IdentityResolver, StaticIdentity};
pub use member::Member;
pub use registry::{HostRegistry, RegistryError};
pub use selector::{RotationSelector, Selection};
