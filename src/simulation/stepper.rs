use crate::components::{AircraftHandle, ConfigError, ControlInputSnapshot, RigidBodyState};
use crate::resources::{EnvironmentSnapshot, SimulationConfig};
use crate::systems::{calculate_air_data, integrate_step, AircraftDynamics, DynamicsInputs, Propulsion};

use super::error::SimError;
use super::state_log::{DerivedOutputs, LogEntry};

/// Owns the mutable simulation state and advances it one step at a time.
///
/// The threaded loop drives one of these; it can also be driven directly for
/// deterministic, single-threaded runs.
#[derive(Debug, Clone)]
pub struct Stepper {
    dynamics: AircraftDynamics,
    propulsion: Propulsion,
    state: RigidBodyState,
    alpha_dot: f64,
    steps: u64,
    dt: f64,
    reference: (f64, f64),
}

impl Stepper {
    /// Engines start at their steady state for `controls` so that a trimmed
    /// state stays trimmed.
    pub fn new(
        aircraft: AircraftHandle,
        initial_state: RigidBodyState,
        controls: &ControlInputSnapshot,
        environment: &EnvironmentSnapshot,
        config: &SimulationConfig,
    ) -> Result<Self, SimError> {
        config.validate()?;
        if !initial_state.is_finite() {
            return Err(ConfigError::ValidationError(
                "initial state must be finite".to_string(),
            )
            .into());
        }

        let dynamics = AircraftDynamics::new(aircraft, &config.physics);
        let mut propulsion = Propulsion::new(&dynamics.aircraft().engines);
        let sample = dynamics.sample_environment(&initial_state, environment);
        let air_data = calculate_air_data(&initial_state, &sample);
        propulsion.settle(controls, &sample.atmosphere, air_data.true_airspeed);

        Ok(Self {
            dynamics,
            propulsion,
            state: initial_state.wrapped(),
            alpha_dot: 0.0,
            steps: 0,
            dt: config.physics.dt,
            reference: (config.initial_latitude, config.initial_longitude),
        })
    }

    pub fn state(&self) -> &RigidBodyState {
        &self.state
    }

    /// Steps completed so far; also the index the next entry gets.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn time(&self) -> f64 {
        self.steps as f64 * self.dt
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Advances by one step with the given inputs.
    ///
    /// Engine dynamics are updated once, then the rigid body is integrated
    /// with the engine output held. A non-finite result leaves the state as
    /// it was and returns [`SimError::NonFinite`].
    pub fn step(
        &mut self,
        controls: &ControlInputSnapshot,
        environment: &EnvironmentSnapshot,
    ) -> Result<LogEntry, SimError> {
        let sample = self.dynamics.sample_environment(&self.state, environment);
        let airspeed = calculate_air_data(&self.state, &sample).true_airspeed;
        let mut propulsion = self.propulsion.clone();
        propulsion.update_state(controls, &sample.atmosphere, airspeed, self.dt);

        let inputs = DynamicsInputs {
            controls,
            environment,
            propulsion: propulsion.total(),
            alpha_dot: self.alpha_dot,
        };
        let result = integrate_step(&self.dynamics, &self.state, &inputs, self.dt);

        if !result.state.is_finite() || !result.alpha_dot.is_finite() {
            return Err(SimError::NonFinite { step: self.steps });
        }

        let step = self.steps;
        self.steps += 1;
        self.state = result.state;
        self.alpha_dot = result.alpha_dot;
        self.propulsion = propulsion;

        Ok(LogEntry {
            step,
            time: self.time(),
            state: self.state,
            controls: controls.clone(),
            environment: *environment,
            derived: DerivedOutputs::new(
                &self.state,
                &result.evaluation,
                self.propulsion.state(),
                self.reference,
            ),
        })
    }
}
