// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Fan-out demo behind the `neurotest` binary
//!
//! Builds one source neuron with an external input and `fan_out` targets, fires
//! the source, waits for every target to go quiet and reports final snapshots.

use anyhow::{Context, Result};
use neuronet_config::NeuronetConfig;
use neuronet_core::{link_one_to_many, open_input, Network, NetworkConfig, NeuronStatus};
use tracing::{info, warn};

/// Outcome of one demo run
#[derive(Debug, Clone)]
pub struct DemoReport {
    /// Final status of the source neuron
    pub source: NeuronStatus,
    /// Final status of each target, in link order
    pub targets: Vec<NeuronStatus>,
    /// Impulses the source accepted
    pub delivered: usize,
    /// Whether each target reached quiescence before its timeout
    pub quiet: Vec<bool>,
}

impl DemoReport {
    pub fn all_quiet(&self) -> bool {
        self.quiet.iter().all(|&reached| reached)
    }
}

/// Wire, start, stimulate and stop the demo network
///
/// The network is always stopped before returning successfully.
pub fn run_demo(config: &NeuronetConfig) -> Result<DemoReport> {
    let mut network = Network::new(NetworkConfig {
        tick_period: config.network.tick_period(),
    })
    .context("Failed to create network")?;

    let threshold = config.network.default_threshold;
    let source = network.add_neuron(threshold);
    let targets = network.add_neurons(config.demo.fan_out, threshold);

    let _input = open_input(&source).context("Failed to open source input")?;
    link_one_to_many(&source, &targets).context("Failed to link source to targets")?;

    network.start_all().context("Failed to start network")?;
    network.status_all();

    let delivered = (0..config.demo.impulses)
        .filter(|_| network.fire(&source, config.demo.impulse_value))
        .count();
    info!(
        "Fired {} of {} impulses of {} into {}",
        delivered,
        config.demo.impulses,
        config.demo.impulse_value,
        source.id()
    );

    let mut quiet = Vec::with_capacity(targets.len());
    for target in &targets {
        let reached = target
            .wait_for_quiet_timeout(config.demo.quiet_timeout())
            .with_context(|| format!("Waiting for {} to go quiet", target.id()))?;
        if !reached {
            warn!(
                "{} not quiet after {} ms",
                target.id(),
                config.demo.quiet_timeout_ms
            );
        }
        quiet.push(reached);
    }

    network.status_all();
    network.shutdown();

    let mut snapshots = network.snapshot_all().into_iter();
    let source = snapshots
        .next()
        .context("Source neuron status unavailable")?;
    let targets: Vec<NeuronStatus> = snapshots.collect();

    Ok(DemoReport {
        source,
        targets,
        delivered,
        quiet,
    })
}
