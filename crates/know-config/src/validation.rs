// SPDX-FileCopyrightText: 2026 Know Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Collects every problem instead of failing fast.

use crate::diagnostic::ConfigError;
use crate::model::KnowConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
pub fn validate_config(config: &KnowConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let level = config.general.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::validation(format!(
            "general.log_level `{}` is not one of: {}",
            config.general.log_level,
            LOG_LEVELS.join(", ")
        )));
    }

    let host = config.opencode.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::validation("opencode.host must not be empty"));
    } else if !host
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '.' | '-' | ':' | '[' | ']'))
    {
        errors.push(ConfigError::validation(format!(
            "opencode.host `{host}` is not a valid IP address or hostname"
        )));
    }

    if config.opencode.port == 0 {
        errors.push(ConfigError::validation("opencode.port must not be 0"));
    }

    let url = config.prefrontal.url.trim();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        errors.push(ConfigError::validation(format!(
            "prefrontal.url `{url}` must start with http:// or https://"
        )));
    }

    for (section, timeout) in [
        ("opencode.timeout_secs", config.opencode.timeout_secs),
        ("opencode.probe_timeout_secs", config.opencode.probe_timeout_secs),
        ("prefrontal.timeout_secs", config.prefrontal.timeout_secs),
        ("prefrontal.probe_timeout_secs", config.prefrontal.probe_timeout_secs),
    ] {
        if timeout == 0 {
            errors.push(ConfigError::validation(format!("{section} must be at least 1")));
        }
    }

    if config.cache.dir.trim().is_empty() {
        errors.push(ConfigError::validation("cache.dir must not be empty"));
    }

    if config.routing.fallback_provider.trim().is_empty() {
        errors.push(ConfigError::validation(
            "routing.fallback_provider must not be empty",
        ));
    }

    if config.routing.consensus_models.is_empty() {
        errors.push(ConfigError::validation(
            "routing.consensus_models must name at least one model",
        ));
    }

    for (intent, route) in &config.routing.routes {
        if intent.trim().is_empty() {
            errors.push(ConfigError::validation("routing.routes has an empty intent name"));
        }
        if route.provider.trim().is_empty() {
            errors.push(ConfigError::validation(format!(
                "routing.routes.{intent}.provider must not be empty"
            )));
        }
        if route.model.trim().is_empty() {
            errors.push(ConfigError::validation(format!(
                "routing.routes.{intent}.model must not be empty"
            )));
        }
    }

    if config.context.limit == 0 {
        errors.push(ConfigError::validation("context.limit must be at least 1"));
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
    fn default_config_is_valid() {
        assert!(validate_config(&KnowConfig::default()).is_ok());
    }

    #[test]
    fn collects_every_error() {
        let mut config = KnowConfig::default();
        config.opencode.host = " ".into();
        config.opencode.port = 0;
        config.prefrontal.url = "ftp://example.com".into();
        config.context.limit = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn rejects_empty_consensus_list() {
        let mut config = KnowConfig::default();
        config.routing.consensus_models.clear();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].to_string().contains("consensus_models"));
    }

    #[test]
    fn rejects_unknown_log_level() {
        let mut config = KnowConfig::default();
        config.general.log_level = "loud".into();
        assert!(validate_config(&config).is_err());
        config.general.log_level = "DEBUG".into();
        assert!(validate_config(&config).is_ok());
    }
}
