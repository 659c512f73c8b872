// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Neuronet Core
//!
//! Actor-per-neuron runtime. Each neuron runs on its own thread and talks to its
//! peers only through rendezvous links carrying integer impulses.
//!
//! - **Links** ([`link`], [`link_one_to_many`], [`link_many_to_one`]): unbuffered
//!   channels, wired while both ends are still stopped
//! - **Actor loop**: a wait-set rebuilt every step over control, tick timer and
//!   every live input
//! - **Quiescence**: [`Neuron::wait_for_quiet`] returns once a full tick period
//!   passes with no impulse received
//! - **Registry**: [`Network`] owns neurons and starts, stops and reports on them
//!   in bulk
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use neuronet_core::{link_one_to_many, open_input, Network, NetworkConfig};
//!
//! let mut network = Network::new(NetworkConfig { tick_period: Duration::from_millis(100) })?;
//! let a = network.add_neuron(0);
//! let targets = network.add_neurons(2, 0);
//! let _port = open_input(&a)?;
//! link_one_to_many(&a, &targets)?;
//!
//! network.start_all()?;
//! network.fire(&a, 1);
//! a.wait_for_quiet()?;
//! network.shutdown();
//! # Ok::<(), neuronet_core::NeuronError>(())
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod actor;
pub mod command;
pub mod error;
pub mod link;
pub mod network;
pub mod neuron;
mod quiet;
pub mod status;

pub use command::ControlCommand;
pub use error::{NeuronError, Result};
pub use link::{create_link, link, link_many_to_one, link_one_to_many, open_input, InputPort};
pub use network::{Network, NetworkConfig};
pub use neuron::{Impulse, Neuron, NeuronHandle, NeuronId, NeuronState, FIRE_STIMULUS};
pub use status::NeuronStatus;
