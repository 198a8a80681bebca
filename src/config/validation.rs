//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("server.name is required")]
    MissingServerName,
    #[error("server.network is required")]
    MissingNetworkName,
    #[error("server.sid must be exactly 3 characters, got {0}")]
    InvalidSid(usize),
    #[error("server.sid must match pattern [0-9][A-Z0-9][A-Z0-9], got '{0}'")]
    InvalidSidFormat(String),
    #[error("limits.sendq_capacity must be greater than zero")]
    ZeroSendq,
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.name.is_empty() {
        errors.push(ValidationError::MissingServerName);
    }
    if config.server.network.is_empty() {
        errors.push(ValidationError::MissingNetworkName);
    }

    // SID validation (TS6 format)
    let sid = &config.server.sid;
    if sid.len() != 3 {
        errors.push(ValidationError::InvalidSid(sid.len()));
    } else {
        let bytes = sid.as_bytes();
        let valid = bytes[0].is_ascii_digit()
            && bytes[1..]
                .iter()
                .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit());
        if !valid {
            errors.push(ValidationError::InvalidSidFormat(sid.clone()));
        }
    }

    // tokio's bounded mpsc panics on a zero capacity
    if config.limits.sendq_capacity == 0 {
        errors.push(ValidationError::ZeroSendq);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(server: &str, extra: &str) -> Config {
        let toml = format!("[server]\n{}\n{}", server, extra);
        toml::from_str(&toml).unwrap()
    }

    const VALID_SERVER: &str = r#"
name = "test.server"
network = "TestNet"
sid = "00T"
description = "Test"
"#;

    #[test]
    fn test_valid_config_passes() {
        let config = config_with(VALID_SERVER, "");
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_empty_names_fail_together() {
        let config = config_with(
            r#"
name = ""
network = ""
sid = "00T"
"#,
            "",
        );
        let errors = validate(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().any(|e| matches!(e, ValidationError::MissingServerName)));
        assert!(errors.iter().any(|e| matches!(e, ValidationError::MissingNetworkName)));
    }

    #[test]
    fn test_invalid_sid_length_fails() {
        let config = config_with(
            r#"
name = "test"
network = "TestNet"
sid = "0T"
"#,
            "",
        );
        let errors = validate(&config).unwrap_err();
        assert!(errors.iter().any(|e| matches!(e, ValidationError::InvalidSid(2))));
    }

    #[test]
    fn test_lowercase_sid_fails() {
        let config = config_with(
            r#"
name = "test"
network = "TestNet"
sid = "0ab"
"#,
            "",
        );
        let errors = validate(&config).unwrap_err();
        assert!(errors.iter().any(|e| matches!(e, ValidationError::InvalidSidFormat(_))));
    }

    #[test]
    fn test_zero_sendq_fails() {
        let config = config_with(VALID_SERVER, "[limits]\nsendq_capacity = 0\n");
        let errors = validate(&config).unwrap_err();
        assert!(errors.iter().any(|e| matches!(e, ValidationError::ZeroSendq)));
    }
}
