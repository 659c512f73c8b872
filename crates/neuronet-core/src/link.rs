// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Link fabric
//!
//! A link is an unbuffered (rendezvous) channel: `send()` blocks until the
//! receiving actor's multiplex step accepts the value. This gives natural
//! backpressure, a producer can never outrun its consumer.
//!
//! Links are the only way a neuron's inputs and outputs grow, and they can only be
//! created while every endpoint is still parked (not started).

use crossbeam::channel::{bounded, Receiver, Sender};
use parking_lot::MutexGuard;
use tracing::trace;

use crate::actor::NeuronCore;
use crate::error::{NeuronError, Result};
use crate::neuron::{Impulse, Neuron, NeuronId};

/// Create one rendezvous link
///
/// # Returns
/// - `(Sender, Receiver)`: producer (axon) and consumer (dendrite) endpoints
pub fn create_link() -> (Sender<Impulse>, Receiver<Impulse>) {
    bounded(0)
}

/// Input and output endpoints owned by one neuron
#[derive(Debug, Default)]
pub(crate) struct Wiring {
    /// Dendrites, in the order links were established
    pub(crate) inputs: Vec<Receiver<Impulse>>,
    /// Axons, in the order links were established
    pub(crate) outputs: Vec<Sender<Impulse>>,
}

impl Wiring {
    pub(crate) fn is_connected(&self) -> bool {
        !self.inputs.is_empty() || !self.outputs.is_empty()
    }
}

/// Producer endpoint held outside any actor (e.g. by the entry point)
///
/// Gives a neuron an input without requiring an upstream neuron. The first
/// port opened on a neuron with no inputs becomes its stimulus port.
#[derive(Debug, Clone)]
pub struct InputPort {
    target: NeuronId,
    tx: Sender<Impulse>,
}

impl InputPort {
    /// Neuron this port delivers into
    pub fn target(&self) -> NeuronId {
        self.target
    }

    /// Deliver one impulse, blocking until the target accepts it
    ///
    /// Returns `false` if the target has terminated.
    pub fn send(&self, impulse: Impulse) -> bool {
        self.tx.send(impulse).is_ok()
    }
}

/// Connect an axon of `from` to a new dendrite of `to`
pub fn link(from: &Neuron, to: &Neuron) -> Result<()> {
    let (mut from_core, mut to_core) = lock_pair(from, to)?;
    let from_core = parked(&mut from_core, from)?;
    let to_core = parked(&mut to_core, to)?;

    attach(from, from_core, to, to_core);
    Ok(())
}

/// Connect `from` as the sole producer into every neuron in `many`
///
/// Every endpoint is validated before any link is made.
pub fn link_one_to_many(from: &Neuron, many: &[impl AsRef<Neuron>]) -> Result<()> {
    for to in many {
        ensure_linkable(from, to.as_ref())?;
    }
    for to in many {
        link(from, to.as_ref())?;
    }
    Ok(())
}

/// Connect every neuron in `many` as a producer into `to`
///
/// Every endpoint is validated before any link is made.
pub fn link_many_to_one(to: &Neuron, many: &[impl AsRef<Neuron>]) -> Result<()> {
    for from in many {
        ensure_linkable(from.as_ref(), to)?;
    }
    for from in many {
        link(from.as_ref(), to)?;
    }
    Ok(())
}

/// Open an externally held input on `to`
pub fn open_input(to: &Neuron) -> Result<InputPort> {
    let mut guard = to.core.lock();
    let core = parked(&mut guard, to)?;

    let (tx, rx) = create_link();
    if core.wiring.inputs.is_empty() {
        to.set_stimulus_port(tx.clone());
    }
    core.wiring.inputs.push(rx);
    to.mark_connected();
    trace!("Opened external input {} on {}", core.wiring.inputs.len() - 1, to.id());

    Ok(InputPort { target: to.id(), tx })
}

fn attach(from: &Neuron, from_core: &mut NeuronCore, to: &Neuron, to_core: &mut NeuronCore) {
    let (tx, rx) = create_link();
    if to_core.wiring.inputs.is_empty() {
        to.set_stimulus_port(tx.clone());
    }
    to_core.wiring.inputs.push(rx);
    from_core.wiring.outputs.push(tx);
    from.mark_connected();
    to.mark_connected();
    trace!("Linked {} -> {}", from.id(), to.id());
}

fn ensure_linkable(from: &Neuron, to: &Neuron) -> Result<()> {
    if from.id() == to.id() {
        return Err(NeuronError::SelfLink(from.id()));
    }
    for neuron in [from, to] {
        if neuron.core.lock().is_none() {
            return Err(NeuronError::TopologyFrozen(neuron.id()));
        }
    }
    Ok(())
}

type CoreGuard<'a> = MutexGuard<'a, Option<NeuronCore>>;

/// Lock both cores in id order so concurrent linkers cannot deadlock
fn lock_pair<'a>(from: &'a Neuron, to: &'a Neuron) -> Result<(CoreGuard<'a>, CoreGuard<'a>)> {
    if from.id() == to.id() {
        return Err(NeuronError::SelfLink(from.id()));
    }
    if from.id() < to.id() {
        let from_guard = from.core.lock();
        let to_guard = to.core.lock();
        Ok((from_guard, to_guard))
    } else {
        let to_guard = to.core.lock();
        let from_guard = from.core.lock();
        Ok((from_guard, to_guard))
    }
}

fn parked<'g>(guard: &'g mut CoreGuard<'_>, neuron: &Neuron) -> Result<&'g mut NeuronCore> {
    guard
        .as_mut()
        .ok_or(NeuronError::TopologyFrozen(neuron.id()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neuron::NeuronHandle;
    use std::time::Duration;

    fn neurons(count: usize) -> Vec<NeuronHandle> {
        (0..count)
            .map(|_| Neuron::new(0, Duration::from_secs(1)))
            .collect()
    }

    fn counts(neuron: &Neuron) -> (usize, usize) {
        let status = neuron.snapshot().expect("parked neuron has a status");
        (status.inputs, status.outputs)
    }

    #[test]
    fn test_link_marks_both_connected() {
        let ns = neurons(2);
        assert!(!ns[0].is_connected());
        assert!(!ns[1].is_connected());

        link(&ns[0], &ns[1]).unwrap();

        assert!(ns[0].is_connected());
        assert!(ns[1].is_connected());
        assert_eq!(counts(&ns[0]), (0, 1));
        assert_eq!(counts(&ns[1]), (1, 0));
    }

    #[test]
    fn test_one_to_many_symmetry() {
        let ns = neurons(4);
        let (a, many) = ns.split_first().unwrap();

        link_one_to_many(a, many).unwrap();

        assert_eq!(counts(a), (0, 3));
        for b in many {
            assert_eq!(counts(b), (1, 0));
        }
    }

    #[test]
    fn test_many_to_one_symmetry() {
        let ns = neurons(4);
        let (a, many) = ns.split_first().unwrap();

        link_many_to_one(a, many).unwrap();

        assert_eq!(counts(a), (3, 0));
        for b in many {
            assert_eq!(counts(b), (0, 1));
        }
    }

    #[test]
    fn test_repeated_links_add_parallel_connections() {
        let ns = neurons(2);
        link(&ns[0], &ns[1]).unwrap();
        link(&ns[0], &ns[1]).unwrap();
        link(&ns[1], &ns[0]).unwrap();

        assert_eq!(counts(&ns[0]), (1, 2));
        assert_eq!(counts(&ns[1]), (2, 1));
    }

    #[test]
    fn test_self_link_rejected() {
        let ns = neurons(1);
        assert!(matches!(link(&ns[0], &ns[0]), Err(NeuronError::SelfLink(_))));
        assert!(!ns[0].is_connected());
    }

    #[test]
    fn test_one_to_many_validates_before_wiring() {
        let ns = neurons(3);
        let targets = vec![ns[1].clone(), ns[0].clone(), ns[2].clone()];

        let result = link_one_to_many(&ns[0], &targets);

        assert!(matches!(result, Err(NeuronError::SelfLink(_))));
        // Nothing was wired, not even the target before the bad one
        assert_eq!(counts(&ns[0]), (0, 0));
        assert_eq!(counts(&ns[1]), (0, 0));
    }

    #[test]
    fn test_open_input_adds_dendrite() {
        let ns = neurons(1);
        let port = open_input(&ns[0]).unwrap();

        assert_eq!(port.target(), ns[0].id());
        assert_eq!(counts(&ns[0]), (1, 0));
        assert!(ns[0].is_connected());
    }
}
