//! Next-hop selection.
//!
//! Selection is recomputed from scratch on every call from the ring
//! order, the caller's identity and fresh probe results. There is no
//! stored cursor, so concurrent selections never contend.

use std::sync::Arc;

use crate::health::HealthProbe;
use crate::rotation::member::Member;
use crate::rotation::registry::HostRegistry;

/// Outcome of a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection<'a> {
    /// Forward to this member.
    Next(&'a Member),
    /// The next member would be the ring head: one full cycle is done.
    RingComplete,
}

/// Picks the next healthy member in ring order.
#[derive(Clone)]
pub struct RotationSelector {
    registry: Arc<HostRegistry>,
    probe: Arc<dyn HealthProbe>,
}

impl RotationSelector {
    pub fn new(registry: Arc<HostRegistry>, probe: Arc<dyn HealthProbe>) -> Self {
        Self { registry, probe }
    }

    pub fn registry(&self) -> &HostRegistry {
        &self.registry
    }

    /// Select the member after `self_identity`.
    ///
    /// An unknown or unresolved identity scans from the ring head. At most
    /// `len` candidates are probed; the first healthy one wins. If none is
    /// healthy the immediate successor is chosen anyway.
    pub async fn next_host(&self, self_identity: Option<&str>) -> Selection<'_> {
        let members = self.registry.members();
        let len = members.len();

        // `start` is the index of the first candidate: position + 1, with an
        // unknown position counting as -1.
        let start = match self_identity.and_then(|id| self.registry.position(id)) {
            Some(position) => position + 1,
            None => {
                tracing::info!(
                    identity = self_identity.unwrap_or("<unresolved>"),
                    "Identity not found in ring, starting from head"
                );
                0
            }
        };

        let mut chosen = None;
        for offset in 0..len {
            let candidate = &members[(start + offset) % len];
            if self.probe.is_healthy(candidate).await {
                chosen = Some(candidate);
                break;
            }
            tracing::debug!(candidate = %candidate, "Skipping unhealthy member");
        }

        let next = match chosen {
            Some(member) => member,
            None => {
                let fallback = &members[start % len];
                tracing::warn!(
                    fallback = %fallback,
                    "No healthy member found, forwarding to immediate successor"
                );
                fallback
            }
        };

        if next.identity == self.registry.head().identity {
            Selection::RingComplete
        } else {
            Selection::Next(next)
        }
    }
}
