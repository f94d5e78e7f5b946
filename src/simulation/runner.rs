use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

use crate::components::{AircraftHandle, ConfigError, ControlInputSnapshot, RigidBodyState};
use crate::resources::{EnvironmentSnapshot, SimulationConfig};

use super::error::{RunState, SimError, StopReason};
use super::listener::{Broadcaster, ListenerHandle, StepListener};
use super::snapshot::SnapshotSlot;
use super::state_log::{LogEntry, StateLog};
use super::stepper::Stepper;

#[derive(Debug)]
struct LoopStatus {
    run_state: RunState,
    stop_reason: Option<StopReason>,
}

/// State shared between the handle and the loop thread.
struct Shared {
    controls: SnapshotSlot<ControlInputSnapshot>,
    environment: SnapshotSlot<EnvironmentSnapshot>,
    log: Mutex<StateLog>,
    broadcaster: Broadcaster,
    running: AtomicBool,
    status: Mutex<LoopStatus>,
}

/// Marks the loop stopped and disconnects subscribers when the thread
/// exits, including by panic.
struct LoopExit {
    shared: Arc<Shared>,
    reason: Option<StopReason>,
    _done: Sender<()>,
}

impl Drop for LoopExit {
    fn drop(&mut self) {
        let reason = self.reason.take().unwrap_or_else(|| StopReason::Fault {
            step: self.shared.log.lock().last().map_or(0, |e| e.step + 1),
            message: "simulation thread panicked".to_string(),
        });
        self.shared.running.store(false, Ordering::Release);
        {
            let mut status = self.shared.status.lock();
            status.run_state = RunState::Stopped;
            status.stop_reason = Some(reason);
        }
        self.shared.broadcaster.close();
    }
}

/// Lifecycle handle of one simulation run.
///
/// Created idle; [`SimulationHandle::start`] spawns the loop thread, which is
/// the only writer of the rigid-body state, engine state and log. Producers
/// publish controls and environment through snapshot slots; consumers read
/// the log or subscribe. A handle runs once.
pub struct SimulationHandle {
    aircraft: AircraftHandle,
    initial_state: RigidBodyState,
    config: SimulationConfig,
    shared: Arc<Shared>,
    thread: Option<JoinHandle<()>>,
    done: Option<Receiver<()>>,
}

impl SimulationHandle {
    pub fn new(
        aircraft: AircraftHandle,
        initial_state: RigidBodyState,
        controls: ControlInputSnapshot,
        config: SimulationConfig,
    ) -> Result<Self, SimError> {
        config.validate()?;
        if !initial_state.is_finite() {
            return Err(ConfigError::ValidationError(
                "initial state must be finite".to_string(),
            )
            .into());
        }

        let shared = Arc::new(Shared {
            controls: SnapshotSlot::new(controls),
            environment: SnapshotSlot::new(EnvironmentSnapshot::calm()),
            log: Mutex::new(StateLog::new(config.max_log_entries)),
            broadcaster: Broadcaster::new(config.subscriber_buffer),
            running: AtomicBool::new(false),
            status: Mutex::new(LoopStatus {
                run_state: RunState::Idle,
                stop_reason: None,
            }),
        });

        Ok(Self {
            aircraft,
            initial_state,
            config,
            shared,
            thread: None,
            done: None,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn start(&mut self) -> Result<(), SimError> {
        match self.run_state() {
            RunState::Running => return Err(SimError::AlreadyStarted),
            RunState::Stopped => return Err(SimError::AlreadyStopped),
            RunState::Idle => {}
        }

        let controls = self.shared.controls.latest();
        let environment = self.shared.environment.latest();
        let stepper = Stepper::new(
            self.aircraft.clone(),
            self.initial_state,
            &controls,
            &environment,
            &self.config,
        )?;

        let (done_tx, done_rx) = crossbeam_channel::bounded(1);
        self.shared.running.store(true, Ordering::Release);
        self.shared.status.lock().run_state = RunState::Running;

        let shared = self.shared.clone();
        let config = self.config.clone();
        let spawned = thread::Builder::new()
            .name("sixdof-sim".to_string())
            .spawn(move || {
                let mut exit = LoopExit {
                    shared: shared.clone(),
                    reason: None,
                    _done: done_tx,
                };
                exit.reason = Some(run_loop(&shared, stepper, &config));
            });

        match spawned {
            Ok(thread) => {
                info!(
                    "Started simulation of {} at {:.0} Hz",
                    self.aircraft.name,
                    self.config.physics.rate()
                );
                self.thread = Some(thread);
                self.done = Some(done_rx);
                Ok(())
            }
            Err(err) => {
                self.shared.running.store(false, Ordering::Release);
                self.shared.status.lock().run_state = RunState::Idle;
                Err(err.into())
            }
        }
    }

    /// Asks the loop to stop and waits up to the configured join timeout.
    ///
    /// The step in progress completes and is logged. Returns why the loop
    /// stopped, which is not `Requested` if it had already finished.
    pub fn stop(&mut self) -> Result<StopReason, SimError> {
        self.ensure_joinable()?;
        self.shared.running.store(false, Ordering::Release);
        self.join(self.config.join_timeout())
    }

    /// Waits for the loop to stop on its own, as an analysis run does.
    pub fn wait_until_stopped(&mut self, timeout: Duration) -> Result<StopReason, SimError> {
        self.ensure_joinable()?;
        self.join(timeout)
    }

    fn ensure_joinable(&self) -> Result<(), SimError> {
        if self.thread.is_some() {
            return Ok(());
        }
        match self.run_state() {
            RunState::Idle => Err(SimError::NotStarted),
            _ => Err(SimError::AlreadyStopped),
        }
    }

    fn join(&mut self, timeout: Duration) -> Result<StopReason, SimError> {
        if let Some(done) = &self.done {
            match done.recv_timeout(timeout) {
                Ok(()) | Err(RecvTimeoutError::Disconnected) => {}
                Err(RecvTimeoutError::Timeout) => return Err(SimError::JoinTimeout(timeout)),
            }
        }
        self.done = None;
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                error!("Simulation thread panicked");
            }
        }

        let reason = self
            .stop_reason()
            .unwrap_or(StopReason::Requested);
        info!("Simulation stopped: {:?}", reason);
        Ok(reason)
    }

    pub fn run_state(&self) -> RunState {
        self.shared.status.lock().run_state
    }

    pub fn stop_reason(&self) -> Option<StopReason> {
        self.shared.status.lock().stop_reason.clone()
    }

    /// Replaces the controls the next step will use.
    pub fn push_controls(&self, controls: ControlInputSnapshot) {
        self.shared.controls.publish(controls);
    }

    pub fn push_environment(&self, environment: EnvironmentSnapshot) {
        self.shared.environment.publish(environment);
    }

    pub fn controls(&self) -> Arc<ControlInputSnapshot> {
        self.shared.controls.latest()
    }

    pub fn environment(&self) -> Arc<EnvironmentSnapshot> {
        self.shared.environment.latest()
    }

    /// Copy of the log at this instant.
    pub fn log(&self) -> Vec<Arc<LogEntry>> {
        self.shared.log.lock().to_vec()
    }

    pub fn log_len(&self) -> usize {
        self.shared.log.lock().len()
    }

    pub fn latest(&self) -> Option<Arc<LogEntry>> {
        self.shared.log.lock().last()
    }

    pub fn log_json(&self) -> Result<String, serde_json::Error> {
        self.shared.log.lock().to_json()
    }

    /// Empties the log. Step indices carry on from where they were.
    pub fn clear_log(&self) {
        self.shared.log.lock().clear();
    }

    /// Channel receiving every completed step. A subscriber that falls more
    /// than `subscriber_buffer` entries behind misses notifications.
    pub fn subscribe_channel(&self) -> Receiver<Arc<LogEntry>> {
        self.shared.broadcaster.subscribe()
    }

    /// Runs `listener` for every completed step on its own thread. Listener
    /// errors are logged and counted; they never reach the loop.
    pub fn subscribe<L: StepListener>(&self, listener: L) -> Result<ListenerHandle, SimError> {
        ListenerHandle::spawn(self.shared.broadcaster.subscribe(), listener)
    }

    /// Notifications dropped because a subscriber was full.
    pub fn dropped_notifications(&self) -> u64 {
        self.shared.broadcaster.dropped()
    }
}

impl Drop for SimulationHandle {
    fn drop(&mut self) {
        if self.thread.is_some() {
            self.shared.running.store(false, Ordering::Release);
            if let Err(err) = self.join(self.config.join_timeout()) {
                warn!("Simulation thread left running: {}", err);
            }
        }
    }
}

fn run_loop(shared: &Shared, mut stepper: Stepper, config: &SimulationConfig) -> StopReason {
    let step_limit = config.step_limit();
    let dt = Duration::from_secs_f64(config.physics.dt);
    let mut next_deadline = Instant::now() + dt;
    let mut overruns: u64 = 0;

    let reason = loop {
        if !shared.running.load(Ordering::Acquire) {
            break StopReason::Requested;
        }
        if let Some(limit) = step_limit {
            if stepper.steps() >= limit {
                break StopReason::Completed;
            }
        }

        let controls = shared.controls.latest();
        let environment = shared.environment.latest();
        match stepper.step(&controls, &environment) {
            Ok(entry) => {
                let entry = Arc::new(entry);
                shared.log.lock().push(entry.clone());
                shared.broadcaster.publish(&entry);
            }
            Err(err) => {
                error!("Halting simulation: {}", err);
                break StopReason::Fault {
                    step: stepper.steps(),
                    message: err.to_string(),
                };
            }
        }

        if config.pace_real_time {
            let now = Instant::now();
            if now < next_deadline {
                thread::sleep(next_deadline - now);
                next_deadline += dt;
            } else {
                overruns += 1;
                debug!("Step {} overran its deadline", stepper.steps());
                next_deadline = now + dt;
            }
        }
    };

    if overruns > 0 {
        warn!("{} steps overran the real-time budget", overruns);
    }
    debug!("Loop exiting after {} steps", stepper.steps());
    reason
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{AircraftSpec, ControlId};

    fn handle(config: SimulationConfig) -> SimulationHandle {
        let aircraft = AircraftHandle::new(AircraftSpec::navion()).unwrap();
        SimulationHandle::new(
            aircraft,
            RigidBodyState::level(250.0, 5000.0, 0.0),
            ControlInputSnapshot::default().with(ControlId::Throttle, 0.5),
            config,
        )
        .unwrap()
    }

    #[test]
    fn test_lifecycle_errors() {
        let mut sim = handle(SimulationConfig::analysis(0.1));
        assert_eq!(sim.run_state(), RunState::Idle);
        assert!(matches!(sim.stop(), Err(SimError::NotStarted)));

        sim.start().unwrap();
        assert!(matches!(sim.start(), Err(SimError::AlreadyStarted) | Err(SimError::AlreadyStopped)));

        let reason = sim.wait_until_stopped(Duration::from_secs(10)).unwrap();
        assert_eq!(reason, StopReason::Completed);
        assert_eq!(sim.run_state(), RunState::Stopped);
        assert!(matches!(sim.stop(), Err(SimError::AlreadyStopped)));
        assert!(matches!(sim.start(), Err(SimError::AlreadyStopped)));
    }

    #[test]
    fn test_analysis_run_length() {
        let mut sim = handle(SimulationConfig::analysis(0.5));
        sim.start().unwrap();
        sim.wait_until_stopped(Duration::from_secs(10)).unwrap();

        let log = sim.log();
        assert_eq!(log.len(), 50);
        assert!(log.iter().enumerate().all(|(i, e)| e.step == i as u64));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let aircraft = AircraftHandle::new(AircraftSpec::navion()).unwrap();
        let config = SimulationConfig {
            subscriber_buffer: 0,
            ..SimulationConfig::default()
        };
        let result = SimulationHandle::new(
            aircraft,
            RigidBodyState::default(),
            ControlInputSnapshot::default(),
            config,
        );
        assert!(matches!(result, Err(SimError::Config(_))));
    }
}
