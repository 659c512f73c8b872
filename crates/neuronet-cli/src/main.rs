// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use neuronet_config::load_config_or_default;
use neuronet_observability::{
    debug_flags_help, init_logging, parse_debug_flags, CrateDebugFlags, LoggingConfig,
};
use tracing::info;

/// Build a fan-out network, fire its source and report every neuron's status
#[derive(Parser, Debug)]
#[command(name = "neurotest", version, author, long_about = None, after_help = debug_flags_help())]
struct Args {
    /// Path to neuronet.toml (searched for when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Threshold for every neuron
    #[arg(long, allow_hyphen_values = true)]
    threshold: Option<i64>,

    /// Number of targets linked from the source
    #[arg(long)]
    fan_out: Option<usize>,

    /// Number of impulses fired into the source
    #[arg(long)]
    impulses: Option<usize>,

    /// Quiescence tick period in milliseconds
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Raise one crate to debug logging (repeatable)
    #[arg(long = "debug", value_name = "CRATE")]
    debug: Vec<String>,

    /// Raise every neuronet crate to debug logging
    #[arg(long, default_value_t = false)]
    debug_all: bool,

    /// Log at debug level everywhere
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

impl Args {
    fn overrides(&self) -> HashMap<String, String> {
        let mut overrides = HashMap::new();
        if let Some(threshold) = self.threshold {
            overrides.insert("default_threshold".to_string(), threshold.to_string());
        }
        if let Some(fan_out) = self.fan_out {
            overrides.insert("fan_out".to_string(), fan_out.to_string());
        }
        if let Some(impulses) = self.impulses {
            overrides.insert("impulses".to_string(), impulses.to_string());
        }
        if let Some(tick_ms) = self.tick_ms {
            overrides.insert("tick_period_ms".to_string(), tick_ms.to_string());
        }
        if self.verbose {
            overrides.insert("log_level".to_string(), "debug".to_string());
        }
        overrides
    }

    /// Add the clap-declared debug options to flags already parsed from the process
    fn debug_flags(&self, mut flags: CrateDebugFlags) -> CrateDebugFlags {
        for crate_name in &self.debug {
            flags.enable(crate_name);
        }
        if self.debug_all {
            flags.enable_all();
        }
        flags
    }
}

/// Separate `--debug-<crate>` flags, which clap cannot declare, from everything else
fn split_crate_flags(args: impl IntoIterator<Item = String>) -> (Vec<String>, Vec<String>) {
    args.into_iter()
        .partition(|arg| arg.starts_with("--debug-") && arg != "--debug-all")
}

fn main() -> Result<()> {
    let (_, clap_args) = split_crate_flags(env::args());
    let args = Args::parse_from(clap_args);

    let config = load_config_or_default(args.config.as_deref(), Some(&args.overrides()))
        .context("Failed to load configuration")?;

    let logging = LoggingConfig::from_strings(&config.logging.level, &config.logging.format)?;
    init_logging(&logging, &args.debug_flags(parse_debug_flags()))?;

    let program = env!("CARGO_BIN_NAME");
    info!("{} version: {} Started", program, env!("CARGO_PKG_VERSION"));
    info!(
        "Network: threshold {}, fan-out {}, {} impulse(s), tick {} ms",
        config.network.default_threshold,
        config.demo.fan_out,
        config.demo.impulses,
        config.network.tick_period_ms
    );

    let report = neurotest::run_demo(&config)?;

    println!("{}", report.source);
    for target in &report.targets {
        println!("{}", target);
    }

    if !report.all_quiet() {
        info!("Some targets did not reach quiescence before the timeout");
    }
    info!("{} Ended", program);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_crate_flags_are_split_off() {
        let (crate_flags, rest) = split_crate_flags(argv(&[
            "neurotest",
            "--debug-neuronet-core",
            "--fan-out",
            "4",
            "--debug-all",
        ]));
        assert_eq!(crate_flags, argv(&["--debug-neuronet-core"]));
        assert_eq!(rest, argv(&["neurotest", "--fan-out", "4", "--debug-all"]));
    }

    #[test]
    fn test_args_map_to_overrides_and_flags() {
        let args = Args::parse_from(argv(&[
            "neurotest",
            "--threshold",
            "-2",
            "--tick-ms",
            "50",
            "--debug",
            "neuronet-config",
            "--verbose",
        ]));

        let overrides = args.overrides();
        assert_eq!(overrides.get("default_threshold").map(String::as_str), Some("-2"));
        assert_eq!(overrides.get("tick_period_ms").map(String::as_str), Some("50"));
        assert_eq!(overrides.get("log_level").map(String::as_str), Some("debug"));
        assert!(!overrides.contains_key("fan_out"));

        let flags = args.debug_flags(CrateDebugFlags::from_args(argv(&["--debug-neuronet-core"])));
        assert!(flags.is_enabled("neuronet-core"));
        assert!(flags.is_enabled("neuronet-config"));
    }
}
