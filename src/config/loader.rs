//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::TelephoneConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse configuration from TOML text without validating it.
pub fn parse_config(content: &str) -> Result<TelephoneConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Load configuration from an optional TOML file, apply environment
/// overrides and validate the result.
pub fn load_config(path: Option<&Path>) -> Result<TelephoneConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            parse_config(&content)?
        }
        None => TelephoneConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// `PORT` rebinds the listener on all interfaces.
pub fn apply_env_overrides<F>(config: &mut TelephoneConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(port) = lookup("PORT").filter(|p| !p.trim().is_empty()) {
        config.listener.bind_address = format!("0.0.0.0:{}", port.trim());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{LogFormat, TransformerProvider};
    use std::io::Write;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.ring.members.len(), 5);
        assert_eq!(config.ring.members[0].identity, "tele0");
        assert_eq!(config.relay.timeout_secs, 10);
        assert_eq!(config.transformer.provider, TransformerProvider::Gemini);
    }

    #[test]
    fn test_parse_ring_and_sections() {
        let config = parse_config(
            r#"
            [listener]
            bind_address = "127.0.0.1:9000"

            [[ring.members]]
            identity = "alpha"
            message_url = "http://alpha:9000/message"
            health_url = "http://alpha:9000/health"

            [[ring.members]]
            identity = "beta"
            message_url = "http://beta:9001/message"
            health_url = "http://beta:9001/health"

            [transformer]
            provider = "scramble"

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();

        let identities: Vec<_> = config.ring.members.iter().map(|m| m.identity.as_str()).collect();
        assert_eq!(identities, vec!["alpha", "beta"]);
        assert_eq!(config.transformer.provider, TransformerProvider::Scramble);
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert_eq!(config.health_check.timeout_secs, 5);
    }

    #[test]
    fn test_port_override() {
        let mut config = TelephoneConfig::default();
        apply_env_overrides(&mut config, |key| (key == "PORT").then(|| "8083".to_string()));
        assert_eq!(config.listener.bind_address, "0.0.0.0:8083");

        let mut config = TelephoneConfig::default();
        apply_env_overrides(&mut config, |_| Some("  ".to_string()));
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[relay]\ntimeout_secs = 0").unwrap();

        match load_config(Some(file.path())) {
            Err(ConfigError::Validation(errors)) => {
                assert!(errors.contains(&ValidationError::ZeroTimeout("relay.timeout_secs")));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_reports_syntax_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[ring").unwrap();
        assert!(matches!(load_config(Some(file.path())), Err(ConfigError::Parse(_))));
    }
}
