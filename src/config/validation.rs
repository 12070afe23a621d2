//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Ring integrity: non-empty, unique identities, absolute http URLs
//! - Validate value ranges (timeouts > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: TelephoneConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;
use url::Url;

use crate::config::schema::TelephoneConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("ring has no members")]
    EmptyRing,

    #[error("ring member #{0} has an empty identity")]
    EmptyIdentity(usize),

    #[error("ring member '{0}' is listed more than once")]
    DuplicateIdentity(String),

    #[error("{field} for '{identity}' is not a valid http URL: {reason}")]
    InvalidUrl {
        identity: String,
        field: &'static str,
        reason: String,
    },

    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("{field} '{value}' is not a socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("limits.max_body_bytes must be greater than zero")]
    ZeroBodyLimit,
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &TelephoneConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    validate_ring(config, &mut errors);

    for (name, value) in [
        ("health_check.timeout_secs", config.health_check.timeout_secs),
        ("relay.timeout_secs", config.relay.timeout_secs),
        ("timeouts.request_secs", config.timeouts.request_secs),
        ("transformer.timeout_secs", config.transformer.timeout_secs),
    ] {
        if value == 0 {
            errors.push(ValidationError::ZeroTimeout(name));
        }
    }

    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_ring(config: &TelephoneConfig, errors: &mut Vec<ValidationError>) {
    let members = &config.ring.members;
    if members.is_empty() {
        errors.push(ValidationError::EmptyRing);
        return;
    }

    let mut seen = HashSet::new();
    for (index, member) in members.iter().enumerate() {
        if member.identity.trim().is_empty() {
            errors.push(ValidationError::EmptyIdentity(index));
        } else if !seen.insert(member.identity.as_str()) {
            errors.push(ValidationError::DuplicateIdentity(member.identity.clone()));
        }

        for (field, raw) in [
            ("message_url", &member.message_url),
            ("health_url", &member.health_url),
        ] {
            if let Err(reason) = check_http_url(raw) {
                errors.push(ValidationError::InvalidUrl {
                    identity: member.identity.clone(),
                    field,
                    reason,
                });
            }
        }
    }
}

/// Members are reached over plain HTTP.
pub(crate) fn check_http_url(raw: &str) -> Result<Url, String> {
    let url = Url::parse(raw).map_err(|e| e.to_string())?;
    if url.scheme() != "http" {
        return Err(format!("unsupported scheme '{}'", url.scheme()));
    }
    if url.host_str().is_none() {
        return Err("missing host".to_string());
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::MemberConfig;

    fn member(identity: &str, port: u16) -> MemberConfig {
        MemberConfig {
            identity: identity.to_string(),
            message_url: format!("http://{}:{}/message", identity, port),
            health_url: format!("http://{}:{}/health", identity, port),
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&TelephoneConfig::default()), Ok(()));
    }

    #[test]
    fn test_empty_ring_rejected() {
        let mut config = TelephoneConfig::default();
        config.ring.members.clear();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::EmptyRing]);
    }

    #[test]
    fn test_duplicate_identity_rejected() {
        let mut config = TelephoneConfig::default();
        config.ring.members = vec![member("a", 1), member("b", 2), member("a", 3)];
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::DuplicateIdentity("a".into())]);
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = TelephoneConfig::default();
        config.ring.members = vec![MemberConfig {
            identity: "".into(),
            message_url: "not a url".into(),
            health_url: "https://secure:1/health".into(),
        }];
        config.relay.timeout_secs = 0;
        config.listener.bind_address = "nowhere".into();

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::EmptyIdentity(0)));
        assert!(errors.contains(&ValidationError::ZeroTimeout("relay.timeout_secs")));
        assert_eq!(
            errors
                .iter()
                .filter(|e| matches!(e, ValidationError::InvalidUrl { .. }))
                .count(),
            2
        );
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::InvalidAddress { field: "listener.bind_address", .. })));
    }

    #[test]
    fn test_metrics_address_only_checked_when_enabled() {
        let mut config = TelephoneConfig::default();
        config.observability.metrics_address = "bogus".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert!(validate_config(&config).is_err());
    }
}
