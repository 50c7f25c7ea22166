// SPDX-FileCopyrightText: 2026 Plinth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::PlinthConfig;

/// Levels accepted by `log.level`.
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration, collecting every error rather than
/// stopping at the first.
pub fn validate_config(config: &PlinthConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.plugins.dir.as_os_str().is_empty() {
        errors.push(ConfigError::Validation {
            message: "plugins.dir must not be empty".to_string(),
        });
    }

    let level = config.log.level.trim().to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "log.level `{}` is not one of: {}",
                config.log.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    let platform = &config.platform;
    match (&platform.os, &platform.arch) {
        (Some(_), None) => errors.push(ConfigError::Validation {
            message: "platform.os is set but platform.arch is not; set both or neither"
                .to_string(),
        }),
        (None, Some(_)) => errors.push(ConfigError::Validation {
            message: "platform.arch is set but platform.os is not; set both or neither"
                .to_string(),
        }),
        _ => {}
    }
    for (key, value) in [("platform.os", &platform.os), ("platform.arch", &platform.arch)] {
        if let Some(v) = value
            && (v.trim().is_empty() || v.contains(['/', '\\', '_']))
        {
            errors.push(ConfigError::Validation {
                message: format!("{key} `{v}` is not a valid platform identifier"),
            });
        }
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
    use std::path::PathBuf;

    #[test]
    fn defaults_are_valid() {
        assert!(validate_config(&PlinthConfig::default()).is_ok());
    }

    #[test]
    fn all_errors_are_collected() {
        let mut config = PlinthConfig::default();
        config.plugins.dir = PathBuf::new();
        config.log.level = "loud".to_string();
        config.platform.os = Some("linux".to_string());

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn platform_identifiers_must_be_plain() {
        let mut config = PlinthConfig::default();
        config.platform.os = Some("linux".to_string());
        config.platform.arch = Some("x86_64".to_string());
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("platform.arch"));
    }
}
