// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Quiescence broadcast
//!
//! A counter of completed quiet windows. The owning actor bumps it on every timer
//! tick that closes a window with zero activity; each waiter remembers the value it
//! saw on entry and returns once the counter moves. Any number of waiters can be
//! pending at once and each one observes the next quiet window independently.

use parking_lot::{Condvar, Mutex};
use std::time::Instant;

/// Outcome of waiting for the next quiet window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum QuietWait {
    Quiet,
    Terminated,
    TimedOut,
}

#[derive(Debug, Default)]
struct QuietState {
    windows: u64,
    terminated: bool,
}

#[derive(Debug, Default)]
pub(crate) struct QuietSignal {
    state: Mutex<QuietState>,
    cvar: Condvar,
}

impl QuietSignal {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Record a completed quiet window and wake every waiter
    pub(crate) fn notify_quiet(&self) {
        let mut state = self.state.lock();
        state.windows = state.windows.wrapping_add(1);
        self.cvar.notify_all();
    }

    /// Mark the owning actor as gone; pending and future waits return `Terminated`
    pub(crate) fn terminate(&self) {
        let mut state = self.state.lock();
        state.terminated = true;
        self.cvar.notify_all();
    }

    /// Block until the next quiet window, actor exit, or `deadline`
    pub(crate) fn wait_next(&self, deadline: Option<Instant>) -> QuietWait {
        let mut state = self.state.lock();
        let seen = state.windows;

        loop {
            if state.windows != seen {
                return QuietWait::Quiet;
            }
            if state.terminated {
                return QuietWait::Terminated;
            }
            match deadline {
                None => self.cvar.wait(&mut state),
                Some(deadline) => {
                    if self.cvar.wait_until(&mut state, deadline).timed_out() {
                        return if state.windows != seen {
                            QuietWait::Quiet
                        } else {
                            QuietWait::TimedOut
                        };
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_wait_times_out_without_quiet_window() {
        let signal = QuietSignal::new();
        let outcome = signal.wait_next(Some(Instant::now() + Duration::from_millis(20)));
        assert_eq!(outcome, QuietWait::TimedOut);
    }

    #[test]
    fn test_all_waiters_observe_one_window() {
        let signal = Arc::new(QuietSignal::new());
        let waiters: Vec<_> = (0..4)
            .map(|_| {
                let signal = Arc::clone(&signal);
                thread::spawn(move || signal.wait_next(Some(Instant::now() + Duration::from_secs(5))))
            })
            .collect();

        // Give the waiters time to park before the window closes
        thread::sleep(Duration::from_millis(50));
        signal.notify_quiet();

        for waiter in waiters {
            assert_eq!(waiter.join().unwrap(), QuietWait::Quiet);
        }
    }

    #[test]
    fn test_terminate_releases_waiters() {
        let signal = Arc::new(QuietSignal::new());
        let waiter = {
            let signal = Arc::clone(&signal);
            thread::spawn(move || signal.wait_next(None))
        };

        thread::sleep(Duration::from_millis(20));
        signal.terminate();

        assert_eq!(waiter.join().unwrap(), QuietWait::Terminated);
        // Later waits do not block once terminated
        assert_eq!(signal.wait_next(None), QuietWait::Terminated);
    }

    #[test]
    fn test_earlier_windows_are_not_replayed() {
        let signal = QuietSignal::new();
        signal.notify_quiet();
        signal.notify_quiet();
        let outcome = signal.wait_next(Some(Instant::now() + Duration::from_millis(20)));
        assert_eq!(outcome, QuietWait::TimedOut);
    }
}
