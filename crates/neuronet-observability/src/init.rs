// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Logging initialization
//!
//! One console layer, text or JSON, behind an `EnvFilter` built from the base level
//! and the per-crate debug flags. Thread names are included because every neuron
//! actor runs on a thread named after its id.

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

use crate::cli::CrateDebugFlags;
use crate::config::{LogFormat, LoggingConfig};

/// Build the event filter for `config` and `debug_flags`
///
/// # Errors
/// Fails if the base level is not a `tracing` level name.
pub fn build_filter(config: &LoggingConfig, debug_flags: &CrateDebugFlags) -> Result<EnvFilter> {
    let level: tracing::Level = config
        .level
        .parse()
        .map_err(|_| anyhow!("Invalid log level '{}'", config.level))?;
    let directives = debug_flags.to_filter_string(&level.to_string().to_lowercase());

    EnvFilter::try_new(&directives)
        .with_context(|| format!("Invalid log filter: {}", directives))
}

/// Install the global subscriber
///
/// # Errors
/// Fails on an invalid level, or if a global subscriber is already installed.
pub fn init_logging(config: &LoggingConfig, debug_flags: &CrateDebugFlags) -> Result<()> {
    let filter = build_filter(config, debug_flags)?;

    let console_layer = match config.format {
        LogFormat::Text => fmt::layer()
            .with_target(true)
            .with_thread_names(true)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_thread_names(true)
            .boxed(),
    };

    Registry::default()
        .with(console_layer.with_filter(filter))
        .try_init()
        .context("Failed to install tracing subscriber")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_combines_level_and_flags() {
        let config = LoggingConfig::from_strings("WARN", "text").unwrap();
        let flags = CrateDebugFlags::from_crates(["neuronet-core"]);

        let filter = build_filter(&config, &flags).unwrap();
        let rendered = filter.to_string();
        assert!(rendered.contains("warn"));
        assert!(rendered.contains("neuronet_core=debug"));
    }

    #[test]
    fn test_invalid_level_is_rejected() {
        let config = LoggingConfig {
            level: "loud".to_string(),
            format: LogFormat::Text,
        };
        let err = build_filter(&config, &CrateDebugFlags::default()).unwrap_err();
        assert!(err.to_string().contains("loud"));
    }

    #[test]
    fn test_second_install_fails() {
        // Whichever call runs first in this process wins; the next one must fail
        let flags = CrateDebugFlags::default();
        let _ = init_logging(&LoggingConfig::default(), &flags);
        assert!(init_logging(&LoggingConfig::default(), &flags).is_err());
    }
}
