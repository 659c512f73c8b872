// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # neuronet
//!
//! Threshold neurons simulated as independent actors. Every neuron runs on its own
//! thread, accumulates the integer impulses arriving on its inputs and, once the
//! sum exceeds its threshold, emits an impulse on every output. Links are
//! unbuffered rendezvous channels, so a producer waits until its consumer accepts.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! neuronet = "0.1"  # Default: core + config + observability
//! ```
//!
//! ## Feature Flags
//!
//! - **`config`** (default): `neuronet.toml` loading with environment and CLI overrides
//! - **`observability`** (default): logging setup and per-crate debug flags
//!
//! ## Usage
//!
//! ```rust,no_run
//! use neuronet::prelude::*;
//! use std::time::Duration;
//!
//! let mut network = Network::new(NetworkConfig { tick_period: Duration::from_millis(100) })?;
//! let a = network.add_neuron(0);
//! let bs = network.add_neurons(2, 0);
//! let _input = open_input(&a)?;
//! link_one_to_many(&a, &bs)?;
//!
//! network.start_all()?;
//! for _ in 0..3 {
//!     network.fire(&a, 1);
//! }
//! for b in &bs {
//!     b.wait_for_quiet()?;
//! }
//! network.shutdown();
//!
//! for status in network.snapshot_all() {
//!     println!("{}", status);
//! }
//! # Ok::<(), NeuronError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Entry point: neurotest (neuronet-cli)                  │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Registry: Network (start_all / stop_all / status_all)  │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Actors: one thread per neuron, Select over             │
//! │  control + tick + every input                           │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Link fabric: rendezvous channels of i64 impulses       │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## License
//!
//! Apache-2.0

// Re-export runtime
pub use neuronet_core as runtime;

// Re-export ambient layers
#[cfg(feature = "config")]
pub use neuronet_config as config;

#[cfg(feature = "observability")]
pub use neuronet_observability as observability;

/// Prelude - commonly used types and functions
pub mod prelude {
    pub use crate::runtime::{
        link, link_many_to_one, link_one_to_many, open_input, ControlCommand, Impulse, InputPort,
        Network, NetworkConfig, Neuron, NeuronError, NeuronHandle, NeuronId, NeuronState,
        NeuronStatus, FIRE_STIMULUS,
    };

    #[cfg(feature = "config")]
    pub use crate::config::{load_config, load_config_or_default, NeuronetConfig};

    #[cfg(feature = "observability")]
    pub use crate::observability::{init_logging, CrateDebugFlags, LogFormat};
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_facade_imports() {
        use crate::prelude::*;
        let network = Network::default();
        assert!(network.is_empty());
        assert_eq!(FIRE_STIMULUS, 1);
    }
}
