// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Human-readable neuron status

use std::fmt;

use crate::neuron::{Impulse, NeuronId, NeuronState};

/// Point-in-time copy of a neuron's state
///
/// Produced by the actor itself while running, or read from the parked core
/// before start and after exit. Holding a snapshot never grants access to the
/// live accumulator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeuronStatus {
    pub id: NeuronId,
    pub state: NeuronState,
    /// Dendrite (input) count
    pub inputs: usize,
    /// Axon (output) count
    pub outputs: usize,
    pub connected: bool,
    /// Accumulated impulse sum (sigma)
    pub sigma: Impulse,
    pub threshold: Impulse,
    /// Impulses received since the last timer tick
    pub activity: u64,
    /// Number of impulses that pushed sigma over threshold
    pub fired: u64,
    /// Index of the input that delivered the most recent impulse
    pub last_input: Option<usize>,
    /// Multiplexer steps the actor has taken; stays flat while nothing is ready
    pub steps: u64,
}

impl fmt::Display for NeuronStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\nNeuron: {}\n  State..........: {}\n  Dendrite inputs: {}\n  Axon outputs...: {}\n  \
             Connected......: {}\n  Sigma..........: {}\n  Threshold......: {}",
            self.id, self.state, self.inputs, self.outputs, self.connected, self.sigma, self.threshold
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NeuronStatus {
        NeuronStatus {
            id: NeuronId::from_raw(3),
            state: NeuronState::Running,
            inputs: 1,
            outputs: 2,
            connected: true,
            sigma: 3,
            threshold: 0,
            activity: 0,
            fired: 3,
            last_input: Some(0),
            steps: 7,
        }
    }

    #[test]
    fn test_status_template_field_order() {
        let text = sample().to_string();
        let lines: Vec<&str> = text.lines().filter(|l| !l.is_empty()).collect();

        assert_eq!(
            lines,
            vec![
                "Neuron: neuron-3",
                "  State..........: running",
                "  Dendrite inputs: 1",
                "  Axon outputs...: 2",
                "  Connected......: true",
                "  Sigma..........: 3",
                "  Threshold......: 0",
            ]
        );
    }

    #[test]
    fn test_status_reports_negative_sigma() {
        let mut status = sample();
        status.sigma = -12;
        status.state = NeuronState::Stopped;
        let text = status.to_string();
        assert!(text.contains("Sigma..........: -12"));
        assert!(text.contains("State..........: stopped"));
    }
}
