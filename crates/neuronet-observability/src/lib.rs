// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # neuronet-observability
//!
//! Logging setup for neuronet binaries and tests.
//!
//! The library crates only emit `tracing` events. This crate decides where they go:
//! one `fmt` subscriber in text or JSON form, filtered by a base level plus
//! per-crate debug flags (`--debug-<crate>`, `--debug-all`, `NEURONET_DEBUG`).

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod config;
pub mod init;

pub use cli::*;
pub use config::*;
pub use init::*;

/// Crate names accepted by the debug flags
pub const KNOWN_CRATES: &[&str] = &[
    "neuronet-core",
    "neuronet-config",
    "neuronet-observability",
    "neurotest",
];
