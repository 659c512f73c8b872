// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Per-crate debug flags
//!
//! Supports flags like `--debug-neuronet-core` and `--debug-all`, plus the
//! `NEURONET_DEBUG` environment variable.

use std::collections::BTreeSet;
use std::env;

use crate::KNOWN_CRATES;

/// Crates whose logging is raised to `debug`
///
/// # Example
/// ```rust
/// use neuronet_observability::CrateDebugFlags;
///
/// let flags = CrateDebugFlags::from_args(vec!["--debug-neuronet-core".to_string()]);
/// assert!(flags.is_enabled("neuronet-core"));
/// assert_eq!(flags.to_filter_string("info"), "info,neuronet_core=debug");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrateDebugFlags {
    enabled_crates: BTreeSet<String>,
}

impl CrateDebugFlags {
    /// Parse `--debug-{crate-name}` and `--debug-all` from command-line arguments
    ///
    /// Anything else is ignored.
    pub fn from_args<I>(args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut flags = Self::default();
        for arg in args {
            if arg == "--debug-all" {
                flags.enable_all();
            } else if let Some(crate_name) = arg.strip_prefix("--debug-") {
                flags.enable(crate_name);
            }
        }
        flags
    }

    /// Flags for an explicit list of crate names
    pub fn from_crates<I, S>(crates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut flags = Self::default();
        for crate_name in crates {
            flags.enable(crate_name.as_ref());
        }
        flags
    }

    /// Add crates from a `NEURONET_DEBUG`-style value
    ///
    /// Comma separated crate names, or `all`.
    pub fn merge_env_value(&mut self, value: &str) {
        if value.trim() == "all" {
            self.enable_all();
            return;
        }
        for crate_name in value.split(',') {
            self.enable(crate_name);
        }
    }

    pub fn enable(&mut self, crate_name: &str) {
        let crate_name = crate_name.trim();
        if !crate_name.is_empty() {
            self.enabled_crates.insert(crate_name.to_string());
        }
    }

    pub fn enable_all(&mut self) {
        for crate_name in KNOWN_CRATES {
            self.enable(crate_name);
        }
    }

    /// Check if debug is enabled for a specific crate
    pub fn is_enabled(&self, crate_name: &str) -> bool {
        self.enabled_crates.contains(crate_name)
    }

    /// Enabled crates, sorted
    pub fn enabled_crates(&self) -> Vec<&str> {
        self.enabled_crates.iter().map(String::as_str).collect()
    }

    /// `EnvFilter` directive string: `base` for everything, `debug` for enabled crates
    ///
    /// Crate names are mapped to their module path (`-` becomes `_`).
    pub fn to_filter_string(&self, base: &str) -> String {
        let mut filters = vec![base.to_string()];
        filters.extend(
            self.enabled_crates
                .iter()
                .map(|crate_name| format!("{}=debug", crate_name.replace('-', "_"))),
        );
        filters.join(",")
    }
}

/// Debug flags from the process arguments and `NEURONET_DEBUG`
pub fn parse_debug_flags() -> CrateDebugFlags {
    let mut flags = CrateDebugFlags::from_args(env::args());
    if let Ok(value) = env::var("NEURONET_DEBUG") {
        flags.merge_env_value(&value);
    }
    flags
}

/// Help text for debug flags
pub fn debug_flags_help() -> String {
    format!(
        r#"Debug Flags:
  --debug-all                    Enable debug logging for all crates
  --debug-{{crate-name}}          Enable debug logging for specific crate
  --debug {{crate-name}}          Same, as a repeatable option

Available crates:
  {}

Environment Variable:
  NEURONET_DEBUG={{crate-name}}[,{{crate-name}}]  Enable debug for crates (comma-separated)
  NEURONET_DEBUG=all                              Enable debug for all crates
"#,
        KNOWN_CRATES.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_crate_flag() {
        let flags = CrateDebugFlags::from_args(vec!["--debug-neuronet-core".to_string()]);
        assert!(flags.is_enabled("neuronet-core"));
        assert!(!flags.is_enabled("neuronet-config"));
    }

    #[test]
    fn test_unrelated_args_are_ignored() {
        let flags = CrateDebugFlags::from_args(vec![
            "neurotest".to_string(),
            "--fan-out".to_string(),
            "4".to_string(),
            "--verbose".to_string(),
        ]);
        assert!(flags.enabled_crates().is_empty());
        assert_eq!(flags.to_filter_string("warn"), "warn");
    }

    #[test]
    fn test_debug_all() {
        let flags = CrateDebugFlags::from_args(vec!["--debug-all".to_string()]);
        for crate_name in KNOWN_CRATES {
            assert!(flags.is_enabled(crate_name), "{} should be enabled", crate_name);
        }
    }

    #[test]
    fn test_env_value_merges() {
        let mut flags = CrateDebugFlags::from_crates(["neurotest"]);
        flags.merge_env_value(" neuronet-core , ,neuronet-config");
        assert_eq!(
            flags.enabled_crates(),
            vec!["neuronet-config", "neuronet-core", "neurotest"]
        );

        let mut all = CrateDebugFlags::default();
        all.merge_env_value("all");
        assert_eq!(all.enabled_crates().len(), KNOWN_CRATES.len());
    }

    #[test]
    fn test_filter_string_uses_module_paths() {
        let flags = CrateDebugFlags::from_crates(["neuronet-core", "neurotest"]);
        assert_eq!(
            flags.to_filter_string("info"),
            "info,neuronet_core=debug,neurotest=debug"
        );
    }
}
