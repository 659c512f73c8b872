// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Quiescence and lifecycle integration tests.

These tests validate:
- wait_for_quiet returns only after a full tick period without impulses
- Every concurrent waiter is released by the same quiet window
- Stop is graceful, final status survives, and waiters see termination
- Operations on stopped neurons are harmless no-ops
*/

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use neuronet_core::{
    link, link_one_to_many, open_input, ControlCommand, Network, NetworkConfig, Neuron,
    NeuronError, NeuronState,
};

const TICK: Duration = Duration::from_millis(40);

fn network() -> Network {
    Network::new(NetworkConfig { tick_period: TICK }).expect("Failed to create network")
}

#[test]
fn test_quiet_follows_fan_out_burst() {
    let mut network = network();
    let a = network.add_neuron(0);
    let bs = network.add_neurons(2, 0);
    let _port = open_input(&a).unwrap();
    link_one_to_many(&a, &bs).unwrap();
    network.start_all().unwrap();

    for _ in 0..3 {
        network.fire(&a, 1);
    }
    assert!(a.wait_for_quiet_timeout(Duration::from_secs(5)).unwrap());

    // The window that just closed saw no impulses
    let status = a.snapshot().unwrap();
    assert_eq!(status.activity, 0);
    assert_eq!(status.sigma, 3);

    network.shutdown();
}

#[test]
fn test_quiet_waits_out_continuous_activity() {
    let tick = Duration::from_millis(200);
    let a = Neuron::new(i64::MAX, tick);
    let port = open_input(&a).unwrap();
    a.start().unwrap();

    let busy_for = tick * 5;
    let feeder = thread::spawn(move || {
        let started = Instant::now();
        while started.elapsed() < busy_for {
            port.send(1);
            thread::sleep(tick / 20);
        }
        started
    });

    // Give the feeder a head start so the wait begins inside the busy phase
    thread::sleep(tick);
    assert!(a.wait_for_quiet_timeout(Duration::from_secs(10)).unwrap());
    let released = Instant::now();
    let started = feeder.join().unwrap();

    assert!(released.duration_since(started) >= busy_for);

    a.stop();
    a.join();
}

#[test]
fn test_every_waiter_is_released() {
    let mut network = network();
    let a = network.add_neuron(0);
    network.start_all().unwrap();

    let waiters: Vec<_> = (0..5)
        .map(|_| {
            let a = Arc::clone(&a);
            thread::spawn(move || a.wait_for_quiet_timeout(Duration::from_secs(5)))
        })
        .collect();

    for waiter in waiters {
        assert!(waiter.join().unwrap().unwrap());
    }

    network.shutdown();
}

#[test]
fn test_wait_timeout_expires_on_long_tick() {
    let neuron = Neuron::new(0, Duration::from_secs(3600));
    neuron.start().unwrap();

    assert!(!neuron.wait_for_quiet_timeout(Duration::from_millis(30)).unwrap());

    neuron.stop();
    neuron.join();
}

#[test]
fn test_pending_waiter_sees_termination() {
    let neuron = Neuron::new(0, Duration::from_secs(3600));
    neuron.start().unwrap();

    let waiter = {
        let neuron = Arc::clone(&neuron);
        thread::spawn(move || neuron.wait_for_quiet())
    };
    thread::sleep(Duration::from_millis(30));
    assert!(neuron.stop());
    neuron.join();

    assert!(matches!(waiter.join().unwrap(), Err(NeuronError::Terminated(_))));
}

#[test]
fn test_graceful_stop_keeps_final_status() {
    let mut network = network();
    let a = network.add_neuron(0);
    let b = network.add_neuron(0);
    let _port = open_input(&a).unwrap();
    link(&a, &b).unwrap();
    network.start_all().unwrap();

    network.fire(&a, 4);
    network.shutdown();

    let a_status = a.snapshot().unwrap();
    assert_eq!(a_status.state, NeuronState::Stopped);
    assert_eq!(a_status.sigma, 4);
    assert_eq!(a_status.outputs, 1);
    assert_eq!(b.snapshot().unwrap().sigma, 1);

    // Stopped neurons ignore everything
    assert!(!network.fire(&a, 1));
    assert!(!a.stop());
    assert!(!a.send_command(ControlCommand::from_token("status")));
    network.status_all();
    assert_eq!(a.snapshot().unwrap().sigma, 4);
}

#[test]
fn test_unknown_commands_are_ignored() {
    let mut network = network();
    let a = network.add_neuron(0);
    let _port = open_input(&a).unwrap();
    network.start_all().unwrap();

    assert!(a.send_command(ControlCommand::from_token("pause")));
    assert!(a.send_command(ControlCommand::from_token("")));
    assert!(network.fire(&a, 2));

    let status = a.snapshot().unwrap();
    assert_eq!(status.state, NeuronState::Running);
    assert_eq!(status.sigma, 2);

    network.shutdown();
}

#[test]
fn test_stop_all_before_start_is_a_noop() {
    let mut network = network();
    let neurons = network.add_neurons(3, 0);
    network.stop_all();
    network.join_all();

    assert!(!network.is_started());
    for neuron in &neurons {
        assert_eq!(neuron.state(), NeuronState::Stopped);
        assert!(!neuron.is_terminated());
    }

    // Still startable
    network.start_all().unwrap();
    assert!(neurons.iter().all(|n| n.is_running()));
    network.shutdown();
}

#[test]
fn test_restart_after_stop_is_rejected() {
    let mut network = network();
    network.add_neurons(2, 0);
    network.start_all().unwrap();
    network.shutdown();

    assert!(matches!(network.start_all(), Err(NeuronError::Terminated(_))));
}
