// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Network registry
//!
//! An owned collection of neurons with bulk lifecycle operations. There is no
//! process-wide registry: each `Network` is independent and tears its actors down
//! when dropped.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::error::{NeuronError, Result};
use crate::neuron::{Impulse, Neuron, NeuronHandle};
use crate::status::NeuronStatus;

/// Network-wide settings applied to every neuron it creates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    /// Quiescence timer period
    pub tick_period: Duration,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            tick_period: Duration::from_secs(1),
        }
    }
}

impl NetworkConfig {
    pub fn validate(&self) -> Result<()> {
        if self.tick_period.is_zero() {
            return Err(NeuronError::InvalidConfig(
                "tick_period must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Registry of neurons created through it, in creation order
#[derive(Debug)]
pub struct Network {
    config: NetworkConfig,
    neurons: Vec<NeuronHandle>,
    started: bool,
}

impl Default for Network {
    fn default() -> Self {
        Self {
            config: NetworkConfig::default(),
            neurons: Vec::new(),
            started: false,
        }
    }
}

impl Network {
    pub fn new(config: NetworkConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            neurons: Vec::new(),
            started: false,
        })
    }

    /// Create and register a stopped neuron
    pub fn add_neuron(&mut self, threshold: Impulse) -> NeuronHandle {
        let neuron = Neuron::new(threshold, self.config.tick_period);
        debug!("Registered {} (threshold {})", neuron.id(), threshold);
        self.neurons.push(neuron.clone());
        neuron
    }

    /// Create and register `count` neurons sharing one threshold
    pub fn add_neurons(&mut self, count: usize, threshold: Impulse) -> Vec<NeuronHandle> {
        (0..count).map(|_| self.add_neuron(threshold)).collect()
    }

    pub fn neurons(&self) -> &[NeuronHandle] {
        &self.neurons
    }

    pub fn len(&self) -> usize {
        self.neurons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neurons.is_empty()
    }

    /// True between `start_all` and `stop_all`
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Start every registered neuron in registration order
    ///
    /// Stops at the first neuron that fails to start; earlier ones keep running.
    pub fn start_all(&mut self) -> Result<()> {
        for (index, neuron) in self.neurons.iter().enumerate() {
            neuron.start()?;
            info!("Started neuron{}: {}", index, neuron.id());
        }
        self.started = true;
        Ok(())
    }

    /// Send a stop command to every running neuron in registration order
    ///
    /// Does not wait for the actors to exit; see [`Network::join_all`].
    pub fn stop_all(&mut self) {
        for (index, neuron) in self.neurons.iter().enumerate() {
            if neuron.stop() {
                info!("Stopped neuron{}: {}", index, neuron.id());
            } else {
                debug!("neuron{} ({}) was not running", index, neuron.id());
            }
        }
        self.started = false;
    }

    /// Wait for every started actor thread to exit
    pub fn join_all(&mut self) {
        for neuron in &self.neurons {
            neuron.join();
        }
    }

    /// Stop every neuron and wait for all of them to exit
    pub fn shutdown(&mut self) {
        self.stop_all();
        self.join_all();
    }

    /// Log the status of every neuron
    ///
    /// After `start_all` each actor formats and logs its own status; otherwise the
    /// status is formatted here, synchronously.
    pub fn status_all(&self) {
        for (index, neuron) in self.neurons.iter().enumerate() {
            if self.started {
                debug!("Status requested for neuron{}: {}", index, neuron.id());
                neuron.request_status();
            } else {
                match neuron.snapshot() {
                    Some(status) => info!("Status for neuron{}: {}{}", index, neuron.id(), status),
                    None => warn!("Status for neuron{} ({}) unavailable", index, neuron.id()),
                }
            }
        }
    }

    /// Snapshot every neuron in registration order
    pub fn snapshot_all(&self) -> Vec<NeuronStatus> {
        self.neurons
            .iter()
            .filter_map(|neuron| neuron.snapshot())
            .collect()
    }

    /// Deliver an impulse on the target's first input; see [`Neuron::fire`]
    pub fn fire(&self, target: &Neuron, impulse: Impulse) -> bool {
        target.fire(impulse)
    }

    /// Fire each target in turn
    ///
    /// A target that ignores the impulse does not stop delivery to the rest.
    /// Returns how many targets accepted it.
    pub fn fire_multiple(&self, targets: &[NeuronHandle], impulse: Impulse) -> usize {
        targets.iter().filter(|target| target.fire(impulse)).count()
    }
}

impl Drop for Network {
    fn drop(&mut self) {
        if self.neurons.iter().any(|neuron| neuron.is_running()) {
            warn!("Network dropped with running neurons, shutting down now");
            self.shutdown();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::{link_one_to_many, open_input};
    use crate::neuron::NeuronState;

    fn fast_network() -> Network {
        Network::new(NetworkConfig {
            tick_period: Duration::from_millis(20),
        })
        .unwrap()
    }

    #[test]
    fn test_zero_tick_period_rejected() {
        let result = Network::new(NetworkConfig {
            tick_period: Duration::ZERO,
        });
        assert!(matches!(result, Err(NeuronError::InvalidConfig(_))));
    }

    #[test]
    fn test_add_neurons_registers_in_order() {
        let mut network = fast_network();
        let first = network.add_neuron(3);
        let rest = network.add_neurons(4, 7);

        assert_eq!(network.len(), 5);
        assert_eq!(network.neurons()[0].id(), first.id());
        for (registered, created) in network.neurons()[1..].iter().zip(&rest) {
            assert_eq!(registered.id(), created.id());
            assert_eq!(registered.threshold(), 7);
        }
        assert!(network.neurons().iter().all(|n| n.state() == NeuronState::Stopped));
    }

    #[test]
    fn test_start_and_shutdown_cycle() {
        let mut network = fast_network();
        network.add_neurons(3, 0);
        assert!(!network.is_started());

        network.start_all().unwrap();
        assert!(network.is_started());
        assert!(network.neurons().iter().all(|n| n.is_running()));

        network.shutdown();
        assert!(!network.is_started());
        assert!(network.neurons().iter().all(|n| n.state() == NeuronState::Stopped));
        assert!(network.neurons().iter().all(|n| n.is_terminated()));
    }

    #[test]
    fn test_status_all_before_start_and_after_stop() {
        let mut network = fast_network();
        let ns = network.add_neurons(2, 0);
        link_one_to_many(&ns[0], &ns[1..]).unwrap();

        // Synchronous path; nothing is running
        network.status_all();

        network.start_all().unwrap();
        network.status_all();
        network.shutdown();

        // Post-stop queries must not touch the (gone) control inputs
        network.status_all();
        let statuses = network.snapshot_all();
        assert_eq!(statuses.len(), 2);
        assert!(statuses.iter().all(|s| s.state == NeuronState::Stopped));
    }

    #[test]
    fn test_fire_multiple_skips_unreachable_targets() {
        let mut network = fast_network();
        let ns = network.add_neurons(3, 100);
        let _port0 = open_input(&ns[0]).unwrap();
        let _port2 = open_input(&ns[2]).unwrap();
        // ns[1] has no inputs
        network.start_all().unwrap();

        assert_eq!(network.fire_multiple(&ns, 4), 2);

        let sigmas: Vec<Impulse> = network.snapshot_all().iter().map(|s| s.sigma).collect();
        assert_eq!(sigmas, vec![4, 0, 4]);
    }

    #[test]
    fn test_drop_shuts_running_network_down() {
        let neuron = {
            let mut network = fast_network();
            let neuron = network.add_neuron(0);
            network.start_all().unwrap();
            neuron
        };
        assert_eq!(neuron.state(), NeuronState::Stopped);
        assert!(neuron.is_terminated());
    }
}
