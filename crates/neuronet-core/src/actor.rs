// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Neuron actor loop
//!
//! Everything the actor mutates lives in [`NeuronCore`]. The core sits parked in
//! its neuron handle until start, then moves into the actor thread and is never
//! touched from outside again. Each step waits on one wait-set rebuilt from scratch:
//!
//! ```text
//! [0] control input   -> status / snapshot / stop
//! [1] tick timer      -> quiescence detection
//! [2..] live inputs   -> accumulate, maybe fire every output
//! ```
//!
//! When several sources are ready at once `Select` picks one at random, so no
//! source kind can starve another.

use std::time::{Duration, Instant};

use crossbeam::channel::{self, Receiver, RecvError, Select};
use tracing::{debug, info, trace};

use crate::command::ControlCommand;
use crate::link::Wiring;
use crate::neuron::{Impulse, Neuron, FIRE_STIMULUS};
use crate::status::NeuronStatus;

/// Control input and timer occupy the first two wait-set slots
const FIXED_SOURCES: usize = 2;

/// Actor-private neuron state
#[derive(Debug)]
pub(crate) struct NeuronCore {
    pub(crate) wiring: Wiring,
    /// Running sum of received impulses (sigma); never reset by firing
    sigma: Impulse,
    /// Impulses received since the last tick
    activity: u64,
    fired: u64,
    last_input: Option<usize>,
    /// Multiplexer steps taken
    steps: u64,
    control: Receiver<ControlCommand>,
    ticker: Receiver<Instant>,
}

/// One event chosen by the multiplexer
enum Event {
    Control(Result<ControlCommand, RecvError>),
    Tick,
    Impulse(usize, Result<Impulse, RecvError>),
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

impl NeuronCore {
    /// Build a parked core; the timer starts now, at creation
    pub(crate) fn new(control: Receiver<ControlCommand>, tick_period: Duration) -> Self {
        Self {
            wiring: Wiring::default(),
            sigma: 0,
            // Creation counts as activity so the first tick never reports quiet
            activity: 1,
            fired: 0,
            last_input: None,
            steps: 0,
            control,
            ticker: channel::tick(tick_period),
        }
    }

    pub(crate) fn status(&self, neuron: &Neuron) -> NeuronStatus {
        NeuronStatus {
            id: neuron.id(),
            state: neuron.state(),
            inputs: self.wiring.inputs.len(),
            outputs: self.wiring.outputs.len(),
            connected: self.wiring.is_connected(),
            sigma: self.sigma,
            threshold: neuron.threshold(),
            activity: self.activity,
            fired: self.fired,
            last_input: self.last_input,
            steps: self.steps,
        }
    }

    /// Run the multiplex-and-react loop until a stop command arrives
    ///
    /// Returns the final status. Endpoints stay open until the caller drops the core.
    pub(crate) fn run(&mut self, neuron: &Neuron) -> NeuronStatus {
        // Inputs whose producers have all gone away; skipped when building the wait-set
        let mut closed = vec![false; self.wiring.inputs.len()];

        loop {
            let event = self.next_event(&closed);
            self.steps += 1;
            let flow = match event {
                Event::Control(Ok(command)) => self.on_command(command, neuron),
                Event::Control(Err(_)) => Flow::Exit,
                Event::Tick => {
                    self.on_tick(neuron);
                    Flow::Continue
                }
                Event::Impulse(input, Ok(value)) => {
                    self.on_impulse(input, value, neuron);
                    Flow::Continue
                }
                Event::Impulse(input, Err(_)) => {
                    debug!("{}: input {} disconnected, dropping it from the wait-set", neuron.id(), input);
                    closed[input] = true;
                    Flow::Continue
                }
            };
            if flow == Flow::Exit {
                break;
            }
        }

        self.status(neuron)
    }

    fn next_event(&self, closed: &[bool]) -> Event {
        let mut select = Select::new();
        let control_index = select.recv(&self.control);
        let tick_index = select.recv(&self.ticker);
        debug_assert_eq!(tick_index + 1, FIXED_SOURCES);

        let live: Vec<usize> = (0..self.wiring.inputs.len())
            .filter(|&input| !closed[input])
            .collect();
        for &input in &live {
            select.recv(&self.wiring.inputs[input]);
        }

        let operation = select.select();
        let index = operation.index();
        if index == control_index {
            Event::Control(operation.recv(&self.control))
        } else if index == tick_index {
            // The ticker never disconnects; only the wake-up matters
            let _ = operation.recv(&self.ticker);
            Event::Tick
        } else {
            let input = live[index - FIXED_SOURCES];
            Event::Impulse(input, operation.recv(&self.wiring.inputs[input]))
        }
    }

    fn on_command(&mut self, command: ControlCommand, neuron: &Neuron) -> Flow {
        match command {
            ControlCommand::Status => {
                info!("Status...{}", self.status(neuron));
            }
            ControlCommand::Snapshot(reply) => {
                // The requester may have given up; nothing to do then
                let _ = reply.try_send(self.status(neuron));
            }
            ControlCommand::Stop => {
                info!("Stopped neuron: {}", neuron.id());
                return Flow::Exit;
            }
            ControlCommand::Unrecognized(token) => {
                trace!("{}: ignoring control token {:?}", neuron.id(), token);
            }
        }
        Flow::Continue
    }

    fn on_tick(&mut self, neuron: &Neuron) {
        if self.activity > 0 {
            self.activity = 0;
        } else {
            trace!("{}: quiet for one full period", neuron.id());
            neuron.quiet.notify_quiet();
        }
    }

    fn on_impulse(&mut self, input: usize, value: Impulse, neuron: &Neuron) {
        self.activity += 1;
        self.sigma = self.sigma.saturating_add(value);
        trace!("{}: impulse {} on input {}, sigma {}", neuron.id(), value, input, self.sigma);

        if self.sigma > neuron.threshold() {
            self.fired += 1;
            for (output, axon) in self.wiring.outputs.iter().enumerate() {
                if axon.send(FIRE_STIMULUS).is_err() {
                    debug!("{}: output {} receiver has terminated", neuron.id(), output);
                }
            }
        }

        self.last_input = Some(input);
    }
}
