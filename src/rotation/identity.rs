//! Local identity resolution.
//!
//! The node's own ring identity is looked up on every selection, never
//! cached, so that the selector stays a pure function of its inputs.

/// Capability that reports which ring member this process is.
pub trait IdentityResolver: Send + Sync {
    /// Current identity, or `None` when it cannot be determined.
    fn resolve(&self) -> Option<String>;
}

/// Resolves identity from the operating system hostname.
#[derive(Debug, Default, Clone, Copy)]
pub struct HostnameResolver;

impl IdentityResolver for HostnameResolver {
    fn resolve(&self) -> Option<String> {
        match hostname::get() {
            Ok(name) => Some(name.to_string_lossy().into_owned()),
            Err(e) => {
                tracing::error!(error = %e, "Error getting hostname");
                None
            }
        }
    }
}

/// Fixed identity, used when a node is pinned to a ring slot.
#[derive(Debug, Clone)]
pub struct StaticIdentity(pub Option<String>);

impl StaticIdentity {
    pub fn new(identity: impl Into<String>) -> Self {
        Self(Some(identity.into()))
    }

    pub fn unresolved() -> Self {
        Self(None)
    }
}

impl IdentityResolver for StaticIdentity {
    fn resolve(&self) -> Option<String> {
        self.0.clone()
    }
}
