// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! Collects every problem before failing so one run reports them all.

use crate::{ConfigError, ConfigResult, NeuronetConfig};

/// Accepted `logging.level` values (case-insensitive)
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Accepted `logging.format` values (case-insensitive)
pub const LOG_FORMATS: [&str; 2] = ["text", "json"];

/// Validation errors that can occur during config validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    MustBePositive { field: String },
    InvalidValue { field: String, reason: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MustBePositive { field } => {
                write!(f, "{} must be greater than zero", field)
            }
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
        }
    }
}

/// Validate the complete configuration
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` listing every failed check
pub fn validate_config(config: &NeuronetConfig) -> ConfigResult<()> {
    let errors = collect_errors(config);
    if errors.is_empty() {
        return Ok(());
    }

    let error_messages = errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::ValidationError(format!(
        "Configuration validation failed:\n{}",
        error_messages
    )))
}

fn collect_errors(config: &NeuronetConfig) -> Vec<ConfigValidationError> {
    let mut errors = Vec::new();

    if config.network.tick_period_ms == 0 {
        errors.push(ConfigValidationError::MustBePositive {
            field: "network.tick_period_ms".to_string(),
        });
    }
    if config.demo.fan_out == 0 {
        errors.push(ConfigValidationError::MustBePositive {
            field: "demo.fan_out".to_string(),
        });
    }
    if config.demo.quiet_timeout_ms == 0 {
        errors.push(ConfigValidationError::MustBePositive {
            field: "demo.quiet_timeout_ms".to_string(),
        });
    }

    let level = config.logging.level.to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "logging.level".to_string(),
            reason: format!("'{}' is not one of {}", config.logging.level, LOG_LEVELS.join(", ")),
        });
    }
    let format = config.logging.format.to_lowercase();
    if !LOG_FORMATS.contains(&format.as_str()) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "logging.format".to_string(),
            reason: format!("'{}' is not one of {}", config.logging.format, LOG_FORMATS.join(", ")),
        });
    }

    errors
}
