mod error;
mod listener;
mod runner;
mod snapshot;
mod state_log;
mod stepper;

pub use error::{ListenerError, RunState, SimError, StopReason};
pub use listener::{Broadcaster, ListenerHandle, StepListener};
pub use runner::SimulationHandle;
pub use snapshot::SnapshotSlot;
pub use state_log::{position_estimate, DerivedOutputs, LogEntry, StateLog};
pub use stepper::Stepper;
