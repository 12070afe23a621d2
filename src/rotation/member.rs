//! Ring member abstraction.

use url::Url;

/// A single node participating in the ring.
///
/// Members are built once from configuration and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// Identity unique within the ring (matched against the node hostname).
    pub identity: String,
    /// Endpoint accepting relayed messages.
    pub message_url: Url,
    /// Endpoint answering liveness probes.
    pub health_url: Url,
}

impl Member {
    pub fn new(identity: impl Into<String>, message_url: Url, health_url: Url) -> Self {
        Self {
            identity: identity.into(),
            message_url,
            health_url,
        }
    }
}

impl std::fmt::Display for Member {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.identity)
    }
}
