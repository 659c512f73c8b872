// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Neuron handle
//!
//! A [`Neuron`] is shared as [`NeuronHandle`] between the registry, the entry point
//! and its own actor thread. The handle holds only what outsiders may touch: the
//! control sender, the stimulus port, the lifecycle state and the quiescence signal.
//! Accumulator, activity and wiring belong to the actor's core.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering};
use std::sync::{Arc, OnceLock};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam::channel::{bounded, Sender};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::actor::NeuronCore;
use crate::command::ControlCommand;
use crate::error::{NeuronError, Result};
use crate::quiet::{QuietSignal, QuietWait};
use crate::status::NeuronStatus;

/// Impulse value carried on links
pub type Impulse = i64;

/// Value emitted on every output when sigma exceeds threshold
pub const FIRE_STIMULUS: Impulse = 1;

/// Shared neuron handle
pub type NeuronHandle = Arc<Neuron>;

/// Process-unique neuron identity, for diagnostics only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NeuronId(u64);

impl NeuronId {
    fn next() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(0);
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[cfg(test)]
    pub(crate) fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for NeuronId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "neuron-{}", self.0)
    }
}

/// Lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum NeuronState {
    Stopped = 0,
    Running = 1,
    /// Reserved; no transition produces it
    Paused = 2,
}

impl NeuronState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => NeuronState::Running,
            2 => NeuronState::Paused,
            _ => NeuronState::Stopped,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NeuronState::Stopped => "stopped",
            NeuronState::Running => "running",
            NeuronState::Paused => "paused",
        }
    }
}

impl fmt::Display for NeuronState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Simulated neuron: this handle plus its own actor thread once running
pub struct Neuron {
    id: NeuronId,
    threshold: Impulse,
    state: AtomicU8,
    connected: AtomicBool,
    control: Sender<ControlCommand>,
    /// Sender side of the first input ever linked; target of `fire`
    stimulus_port: OnceLock<Sender<Impulse>>,
    pub(crate) quiet: QuietSignal,
    /// Parked actor state; `None` once started
    pub(crate) core: Mutex<Option<NeuronCore>>,
    /// Published by the actor as it exits
    final_status: Mutex<Option<NeuronStatus>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl Neuron {
    /// Create a stopped neuron
    ///
    /// The tick timer starts now. The neuron is not registered anywhere; use
    /// [`crate::Network::add_neuron`] for bulk lifecycle control.
    pub fn new(threshold: Impulse, tick_period: Duration) -> NeuronHandle {
        let (control_tx, control_rx) = bounded(0);
        Arc::new(Self {
            id: NeuronId::next(),
            threshold,
            state: AtomicU8::new(NeuronState::Stopped as u8),
            connected: AtomicBool::new(false),
            control: control_tx,
            stimulus_port: OnceLock::new(),
            quiet: QuietSignal::new(),
            core: Mutex::new(Some(NeuronCore::new(control_rx, tick_period))),
            final_status: Mutex::new(None),
            worker: Mutex::new(None),
        })
    }

    pub fn id(&self) -> NeuronId {
        self.id
    }

    pub fn threshold(&self) -> Impulse {
        self.threshold
    }

    pub fn state(&self) -> NeuronState {
        NeuronState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub fn is_running(&self) -> bool {
        self.state() == NeuronState::Running
    }

    /// True once any input or output has been linked
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }

    /// True once the actor thread has exited; such a neuron cannot be restarted
    pub fn is_terminated(&self) -> bool {
        self.final_status.lock().is_some()
    }

    pub(crate) fn mark_connected(&self) {
        self.connected.store(true, Ordering::Relaxed);
    }

    pub(crate) fn set_stimulus_port(&self, port: Sender<Impulse>) {
        // Only the first input qualifies; later calls are ignored
        let _ = self.stimulus_port.set(port);
    }

    fn set_state(&self, state: NeuronState) {
        self.state.store(state as u8, Ordering::Release);
    }

    /// Move the parked core into a dedicated actor thread
    ///
    /// No-op if already running. Fails if the actor has already terminated.
    pub fn start(self: &Arc<Self>) -> Result<()> {
        let mut worker = self.worker.lock();
        if self.is_running() {
            debug!("{} already running", self.id);
            return Ok(());
        }
        let core = match self.core.lock().take() {
            Some(core) => core,
            None => return Err(NeuronError::Terminated(self.id)),
        };

        // Running is set before spawn; only the actor itself ever writes Stopped
        self.set_state(NeuronState::Running);

        let neuron = Arc::clone(self);
        let spawned = thread::Builder::new()
            .name(self.id.to_string())
            .spawn(move || neuron.run_actor(core));

        match spawned {
            Ok(handle) => {
                *worker = Some(handle);
                Ok(())
            }
            Err(source) => {
                self.set_state(NeuronState::Stopped);
                self.quiet.terminate();
                Err(NeuronError::Spawn { id: self.id, source })
            }
        }
    }

    fn run_actor(&self, mut core: NeuronCore) {
        let final_status = core.run(self);

        // Exit path: publish, flip state, release endpoints, then wake waiters
        *self.final_status.lock() = Some(NeuronStatus {
            state: NeuronState::Stopped,
            ..final_status
        });
        self.set_state(NeuronState::Stopped);
        drop(core);
        self.quiet.terminate();
    }

    /// Deliver an impulse on this neuron's first input
    ///
    /// Blocks until the actor accepts it. Returns `false` without blocking when the
    /// neuron is not running or has no inputs, and `false` if it terminated before
    /// accepting. None of these cases is an error.
    pub fn fire(&self, impulse: Impulse) -> bool {
        if !self.is_running() {
            debug!("{} not running; fire({}) ignored", self.id, impulse);
            return false;
        }
        let Some(port) = self.stimulus_port.get() else {
            debug!("{} has no inputs; fire({}) ignored", self.id, impulse);
            return false;
        };
        match port.send(impulse) {
            Ok(()) => true,
            Err(_) => {
                debug!("{} terminated before accepting fire({})", self.id, impulse);
                false
            }
        }
    }

    /// Send a command on the control input, blocking until the actor takes it
    ///
    /// Returns `false` if the neuron is not running (nothing would ever receive).
    pub fn send_command(&self, command: ControlCommand) -> bool {
        if !self.is_running() {
            return false;
        }
        self.control.send(command).is_ok()
    }

    /// Ask the actor to stop; does not wait for it to exit
    pub fn stop(&self) -> bool {
        self.send_command(ControlCommand::Stop)
    }

    /// Have the status text logged
    ///
    /// A running actor formats and logs its own status. Otherwise the status is
    /// formatted here, which is safe because nothing else is touching it.
    pub fn request_status(&self) {
        if self.send_command(ControlCommand::Status) {
            debug!("Status requested for {}", self.id);
            return;
        }
        match self.snapshot() {
            Some(status) => info!("Status...{}", status),
            None => warn!("Status for {} unavailable", self.id),
        }
    }

    /// Copy of the current status
    ///
    /// Running neurons answer through their control input, after every step already
    /// accepted. Parked and terminated neurons are read directly.
    pub fn snapshot(&self) -> Option<NeuronStatus> {
        let (reply_tx, reply_rx) = bounded(1);
        if self.send_command(ControlCommand::Snapshot(reply_tx)) {
            if let Ok(status) = reply_rx.recv() {
                return Some(status);
            }
        }
        if let Some(core) = self.core.lock().as_ref() {
            return Some(core.status(self));
        }
        self.final_status.lock().clone()
    }

    /// Block until one full tick period passes with no impulses received
    ///
    /// Any number of callers may wait at once. Returns `Terminated` if the actor
    /// exits first.
    pub fn wait_for_quiet(&self) -> Result<()> {
        match self.quiet.wait_next(None) {
            QuietWait::Quiet => Ok(()),
            QuietWait::Terminated => Err(NeuronError::Terminated(self.id)),
            // Only a deadline can time out
            QuietWait::TimedOut => unreachable!("quiet wait without a deadline timed out"),
        }
    }

    /// Like [`Neuron::wait_for_quiet`], giving up after `timeout`
    ///
    /// Returns `Ok(false)` on timeout.
    pub fn wait_for_quiet_timeout(&self, timeout: Duration) -> Result<bool> {
        match self.quiet.wait_next(Some(Instant::now() + timeout)) {
            QuietWait::Quiet => Ok(true),
            QuietWait::TimedOut => Ok(false),
            QuietWait::Terminated => Err(NeuronError::Terminated(self.id)),
        }
    }

    /// Wait for the actor thread to exit, if it was ever started
    pub fn join(&self) {
        let handle = self.worker.lock().take();
        if let Some(handle) = handle {
            if handle.join().is_err() {
                warn!("Actor thread for {} panicked", self.id);
            }
        }
    }
}

impl fmt::Debug for Neuron {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Neuron")
            .field("id", &self.id)
            .field("state", &self.state())
            .field("threshold", &self.threshold)
            .field("connected", &self.is_connected())
            .finish()
    }
}
