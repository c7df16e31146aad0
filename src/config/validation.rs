//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, poll interval > 0)
//! - Check that every RPC URL parses
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: SdkConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;

use crate::config::schema::SdkConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid RPC URL '{url}': {reason}")]
    InvalidRpcUrl { url: String, reason: String },

    #[error("blockchain.rpc_timeout_secs must be greater than zero")]
    ZeroRpcTimeout,

    #[error("watcher.poll_interval_ms must be greater than zero")]
    ZeroPollInterval,

    #[error("unknown log level '{0}'")]
    UnknownLogLevel(String),
}

/// Validate a parsed configuration, collecting every error found.
pub fn validate_config(config: &SdkConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let urls = std::iter::once(&config.blockchain.rpc_url).chain(&config.blockchain.failover_urls);
    for rpc_url in urls {
        if let Err(e) = rpc_url.parse::<url::Url>() {
            errors.push(ValidationError::InvalidRpcUrl {
                url: rpc_url.clone(),
                reason: e.to_string(),
            });
        }
    }

    if config.blockchain.rpc_timeout_secs == 0 {
        errors.push(ValidationError::ZeroRpcTimeout);
    }

    if config.watcher.poll_interval_ms == 0 {
        errors.push(ValidationError::ZeroPollInterval);
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(
            config.observability.log_level.clone(),
        ));
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

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&SdkConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = SdkConfig::default();
        config.blockchain.rpc_url = "not a url".to_string();
        config.blockchain.failover_urls.push("http://backup:8545".to_string());
        config.blockchain.rpc_timeout_secs = 0;
        config.watcher.poll_interval_ms = 0;
        config.observability.log_level = "loud".to_string();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(matches!(errors[0], ValidationError::InvalidRpcUrl { .. }));
        assert!(errors.contains(&ValidationError::ZeroRpcTimeout));
        assert!(errors.contains(&ValidationError::ZeroPollInterval));
        assert!(errors.contains(&ValidationError::UnknownLogLevel("loud".to_string())));
    }

    #[test]
    fn test_bad_failover_url() {
        let mut config = SdkConfig::default();
        config.blockchain.failover_urls.push("::nope".to_string());

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("::nope"));
    }

    #[test]
    fn test_log_level_is_case_insensitive() {
        let mut config = SdkConfig::default();
        config.observability.log_level = "DEBUG".to_string();
        assert!(validate_config(&config).is_ok());
    }
}
