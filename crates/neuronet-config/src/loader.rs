// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! Three tiers, later ones winning:
//! 1. TOML file (base values)
//! 2. Environment variables (runtime overrides)
//! 3. CLI arguments (explicit user overrides)

use crate::{validate_config, ConfigError, ConfigResult, NeuronetConfig};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// File name searched for when no explicit path is given
pub const CONFIG_FILE_NAME: &str = "neuronet.toml";

/// Find the neuronet configuration file
///
/// Search order:
/// 1. `NEURONET_CONFIG_PATH` environment variable
/// 2. Current working directory: `./neuronet.toml`
/// 3. Up to 5 parent directories
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var("NEURONET_CONFIG_PATH") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        }
        return Err(ConfigError::FileNotFound(format!(
            "Config file specified by NEURONET_CONFIG_PATH not found: {}",
            path.display()
        )));
    }

    let mut search_paths = Vec::new();
    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));
        search_paths.extend(cwd.ancestors().skip(1).take(5).map(|dir| dir.join(CONFIG_FILE_NAME)));
    }

    if let Some(found) = search_paths.iter().find(|path| path.exists()) {
        return Ok(found.clone());
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "'{}' not found in any of these locations:\n{}\n\nSet NEURONET_CONFIG_PATH to specify a custom location.",
        CONFIG_FILE_NAME, search_list
    )))
}

/// Load configuration from a TOML file, apply overrides and validate
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, the file is searched for.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns error if the file is missing or unreadable, contains invalid TOML, an
/// override cannot be parsed, or the result fails validation
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<NeuronetConfig> {
    let config_file = match config_path {
        Some(path) => path.to_path_buf(),
        None => find_config_file()?,
    };

    let content = fs::read_to_string(&config_file)?;
    let config: NeuronetConfig = toml::from_str(&content)?;

    finish(config, cli_args)
}

/// Like [`load_config`], falling back to built-in defaults when no file is found
///
/// Only a failed search falls back. An explicit `config_path`, or a
/// `NEURONET_CONFIG_PATH` naming a missing file, is still an error.
pub fn load_config_or_default(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<NeuronetConfig> {
    let searched = config_path.is_none() && env::var_os("NEURONET_CONFIG_PATH").is_none();
    match load_config(config_path, cli_args) {
        Err(ConfigError::FileNotFound(_)) if searched => {
            finish(NeuronetConfig::default(), cli_args)
        }
        other => other,
    }
}

fn finish(
    mut config: NeuronetConfig,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<NeuronetConfig> {
    apply_environment_overrides(&mut config)?;
    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli)?;
    }
    validate_config(&config)?;
    Ok(config)
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `NEURONET_TICK_PERIOD_MS` -> `network.tick_period_ms`
/// - `NEURONET_DEFAULT_THRESHOLD` -> `network.default_threshold`
/// - `NEURONET_DEMO_FAN_OUT` -> `demo.fan_out`
/// - `NEURONET_DEMO_IMPULSES` -> `demo.impulses`
/// - `NEURONET_LOG_LEVEL` -> `logging.level`
/// - `NEURONET_LOG_FORMAT` -> `logging.format`
pub fn apply_environment_overrides(config: &mut NeuronetConfig) -> ConfigResult<()> {
    let lookup = |key: &str| env::var(key).ok();

    if let Some(value) = lookup("NEURONET_TICK_PERIOD_MS") {
        config.network.tick_period_ms = parse("NEURONET_TICK_PERIOD_MS", &value)?;
    }
    if let Some(value) = lookup("NEURONET_DEFAULT_THRESHOLD") {
        config.network.default_threshold = parse("NEURONET_DEFAULT_THRESHOLD", &value)?;
    }
    if let Some(value) = lookup("NEURONET_DEMO_FAN_OUT") {
        config.demo.fan_out = parse("NEURONET_DEMO_FAN_OUT", &value)?;
    }
    if let Some(value) = lookup("NEURONET_DEMO_IMPULSES") {
        config.demo.impulses = parse("NEURONET_DEMO_IMPULSES", &value)?;
    }
    if let Some(value) = lookup("NEURONET_LOG_LEVEL") {
        config.logging.level = value;
    }
    if let Some(value) = lookup("NEURONET_LOG_FORMAT") {
        config.logging.format = value;
    }
    Ok(())
}

/// Apply CLI argument overrides to configuration
///
/// Recognized keys: `tick_period_ms`, `default_threshold`, `fan_out`, `impulses`,
/// `impulse_value`, `quiet_timeout_ms`, `log_level`, `log_format`. Other keys are
/// ignored.
///
/// # Arguments
///
/// * `config` - Configuration to modify
/// * `cli_args` - Map of CLI arguments (e.g., `{"fan_out": "4", "log_level": "debug"}`)
pub fn apply_cli_overrides(
    config: &mut NeuronetConfig,
    cli_args: &HashMap<String, String>,
) -> ConfigResult<()> {
    if let Some(value) = cli_args.get("tick_period_ms") {
        config.network.tick_period_ms = parse("tick_period_ms", value)?;
    }
    if let Some(value) = cli_args.get("default_threshold") {
        config.network.default_threshold = parse("default_threshold", value)?;
    }
    if let Some(value) = cli_args.get("fan_out") {
        config.demo.fan_out = parse("fan_out", value)?;
    }
    if let Some(value) = cli_args.get("impulses") {
        config.demo.impulses = parse("impulses", value)?;
    }
    if let Some(value) = cli_args.get("impulse_value") {
        config.demo.impulse_value = parse("impulse_value", value)?;
    }
    if let Some(value) = cli_args.get("quiet_timeout_ms") {
        config.demo.quiet_timeout_ms = parse("quiet_timeout_ms", value)?;
    }
    if let Some(value) = cli_args.get("log_level") {
        config.logging.level = value.clone();
    }
    if let Some(value) = cli_args.get("log_format") {
        config.logging.format = value.clone();
    }
    Ok(())
}

fn parse<T: FromStr>(key: &str, value: &str) -> ConfigResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue(format!("{} = '{}'", key, value)))
}
