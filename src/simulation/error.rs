use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::components::ConfigError;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Simulation loop is already running")]
    AlreadyStarted,
    #[error("Simulation loop has not been started")]
    NotStarted,
    #[error("Simulation loop has already stopped")]
    AlreadyStopped,
    #[error("Simulation thread did not finish within {0:?}")]
    JoinTimeout(Duration),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Non-finite state produced at step {step}")]
    NonFinite { step: u64 },
    #[error("Failed to spawn thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Error raised by a step listener. Logged by its dispatcher, never seen by
/// the loop.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Listener failed: {0}")]
pub struct ListenerError(pub String);

impl ListenerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Lifecycle of a simulation loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    Idle,
    Running,
    Stopped,
}

/// Why a loop reached [`RunState::Stopped`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StopReason {
    /// `stop` was called.
    Requested,
    /// An analysis run reached its duration.
    Completed,
    /// A step produced an invalid state; the state before it is kept.
    Fault { step: u64, message: String },
}
