// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! Each struct maps to one section of `neuronet.toml`. Every field has a default,
//! so a partial (or empty) file is always accepted.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct NeuronetConfig {
    pub network: NetworkSection,
    pub demo: DemoConfig,
    pub logging: LoggingConfig,
}

/// Network-wide neuron settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkSection {
    /// Quiescence timer period in milliseconds
    pub tick_period_ms: u64,
    /// Threshold for neurons created without an explicit one
    pub default_threshold: i64,
}

impl Default for NetworkSection {
    fn default() -> Self {
        Self {
            tick_period_ms: 1000,
            default_threshold: 0,
        }
    }
}

impl NetworkSection {
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }
}

/// Fan-out demo driven by the `neurotest` binary
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Number of targets linked from the source neuron
    pub fan_out: usize,
    /// Number of impulses fired into the source
    pub impulses: usize,
    /// Value of each fired impulse
    pub impulse_value: i64,
    /// Upper bound on each quiescence wait
    pub quiet_timeout_ms: u64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            fan_out: 2,
            impulses: 3,
            impulse_value: 1,
            quiet_timeout_ms: 10_000,
        }
    }
}

impl DemoConfig {
    pub fn quiet_timeout(&self) -> Duration {
        Duration::from_millis(self.quiet_timeout_ms)
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// trace, debug, info, warn or error
    pub level: String,
    /// text or json
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}
