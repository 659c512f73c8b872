// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Administrative commands carried on a neuron's control input

use crossbeam::channel::Sender;

use crate::status::NeuronStatus;

/// Command delivered on the control input, never on a peer link
#[derive(Debug, Clone)]
pub enum ControlCommand {
    /// Log the status text from inside the actor
    Status,
    /// Reply with a status snapshot on the given endpoint
    Snapshot(Sender<NeuronStatus>),
    /// Leave the actor loop permanently
    Stop,
    /// Any token without a handler; the actor ignores it
    Unrecognized(String),
}

impl ControlCommand {
    /// Map a textual command token to a command
    pub fn from_token(token: &str) -> Self {
        match token {
            "status" => ControlCommand::Status,
            "stop" => ControlCommand::Stop,
            other => ControlCommand::Unrecognized(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_token() {
        assert!(matches!(ControlCommand::from_token("status"), ControlCommand::Status));
        assert!(matches!(ControlCommand::from_token("stop"), ControlCommand::Stop));
        match ControlCommand::from_token("pause") {
            ControlCommand::Unrecognized(token) => assert_eq!(token, "pause"),
            other => panic!("unexpected command: {:?}", other),
        }
        // Tokens are case sensitive
        assert!(matches!(ControlCommand::from_token("STOP"), ControlCommand::Unrecognized(_)));
    }
}
