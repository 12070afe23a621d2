//! Host registry.
//!
//! # Responsibilities
//! - Hold the ordered ring built from configuration
//! - Resolve an identity to its message and health endpoints
//! - Expose the ring head used to detect cycle completion
//!
//! The registry is read-only after construction and is shared behind an
//! `Arc` without any locking.

use std::collections::HashMap;

use crate::config::validation::check_http_url;
use crate::config::MemberConfig;
use crate::rotation::member::Member;

/// Error type for registry construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("ring has no members")]
    Empty,

    #[error("ring member '{0}' is listed more than once")]
    Duplicate(String),

    #[error("invalid {field} for '{identity}': {reason}")]
    InvalidUrl {
        identity: String,
        field: &'static str,
        reason: String,
    },
}

/// Immutable lookup table for the ring.
#[derive(Debug, Clone)]
pub struct HostRegistry {
    /// Members in ring order.
    members: Vec<Member>,
    /// identity -> position in `members`.
    positions: HashMap<String, usize>,
}

impl HostRegistry {
    /// Build a registry from already-parsed members, preserving order.
    pub fn new(members: Vec<Member>) -> Result<Self, RegistryError> {
        if members.is_empty() {
            return Err(RegistryError::Empty);
        }

        let mut positions = HashMap::with_capacity(members.len());
        for (index, member) in members.iter().enumerate() {
            if positions.insert(member.identity.clone(), index).is_some() {
                return Err(RegistryError::Duplicate(member.identity.clone()));
            }
        }

        Ok(Self { members, positions })
    }

    /// Build a registry from the `ring.members` config section.
    pub fn from_config(configs: &[MemberConfig]) -> Result<Self, RegistryError> {
        let members = configs
            .iter()
            .map(|config| {
                let parse = |field: &'static str, raw: &str| {
                    check_http_url(raw).map_err(|reason| RegistryError::InvalidUrl {
                        identity: config.identity.clone(),
                        field,
                        reason,
                    })
                };
                Ok(Member::new(
                    config.identity.clone(),
                    parse("message_url", &config.message_url)?,
                    parse("health_url", &config.health_url)?,
                ))
            })
            .collect::<Result<Vec<_>, RegistryError>>()?;

        Self::new(members)
    }

    /// Look up a member by identity.
    pub fn get(&self, identity: &str) -> Option<&Member> {
        self.position(identity).map(|index| &self.members[index])
    }

    /// Message and health endpoints for an identity.
    pub fn endpoints(&self, identity: &str) -> Option<(&url::Url, &url::Url)> {
        self.get(identity).map(|m| (&m.message_url, &m.health_url))
    }

    /// Position of an identity in ring order.
    pub fn position(&self, identity: &str) -> Option<usize> {
        self.positions.get(identity).copied()
    }

    /// All members in ring order.
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Identities in ring order.
    pub fn identities(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|m| m.identity.as_str())
    }

    /// The first member; reaching it as "next" means the cycle is complete.
    pub fn head(&self) -> &Member {
        // Construction guarantees at least one member.
        &self.members[0]
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always false: construction rejects an empty ring.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
