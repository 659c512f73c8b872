// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for neuron and network operations
//!
//! Only structural misuse is reported here. Firing a stopped neuron or sending an
//! unknown control token is absorbed as a no-op and never surfaces as an error.

use crate::neuron::NeuronId;

/// Neuron and network errors
#[derive(Debug, thiserror::Error)]
pub enum NeuronError {
    /// Wiring was attempted after the neuron's core moved into its actor thread
    #[error("{0} has been started; its topology is frozen")]
    TopologyFrozen(NeuronId),

    /// A neuron cannot be linked to itself over a rendezvous channel
    #[error("{0} cannot be linked to itself")]
    SelfLink(NeuronId),

    /// The actor has exited and cannot be restarted or waited on
    #[error("{0} has terminated")]
    Terminated(NeuronId),

    /// The OS refused to spawn the actor thread
    #[error("failed to spawn actor thread for {id}: {source}")]
    Spawn {
        id: NeuronId,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid network configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for neuron and network operations
pub type Result<T> = std::result::Result<T, NeuronError>;
