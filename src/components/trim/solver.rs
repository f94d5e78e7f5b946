use argmin::{
    core::{CostFunction, Error as ArgminError, Executor},
    solver::neldermead::NelderMead,
};
use nalgebra::{DMatrix, DVector, Vector3};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::components::{
    AircraftHandle, ControlId, ControlInputSnapshot, LateralTrimState, LongitudinalTrimState,
    RigidBodyState, TrimCondition, TrimMode, TrimResult, TrimSolverConfig, TrimState,
};
use crate::resources::{EnvironmentSnapshot, PhysicsConfig};
use crate::systems::{AircraftDynamics, DynamicsInputs, Evaluation, Propulsion};
use crate::utils::wrap_two_pi;

#[derive(Error, Debug)]
pub enum TrimError {
    #[error("Invalid trim condition: {0}")]
    InvalidCondition(String),
    #[error("Invalid trim settings: {0}")]
    InvalidSettings(String),
    #[error("Trim optimizer failed: {0}")]
    Optimizer(String),
}

impl From<ArgminError> for TrimError {
    fn from(err: ArgminError) -> Self {
        TrimError::Optimizer(err.to_string())
    }
}

/// Maps trim variables to a flight state and evaluates the body
/// accelerations there. This is what the optimizers see.
#[derive(Debug, Clone)]
pub struct TrimOptimizer {
    dynamics: AircraftDynamics,
    propulsion: Propulsion,
    environment: EnvironmentSnapshot,
    base_controls: ControlInputSnapshot,
    condition: TrimCondition,
    settings: TrimSolverConfig,
    mode: TrimMode,
}

impl TrimOptimizer {
    pub fn mode(&self) -> TrimMode {
        self.mode
    }

    /// Rigid-body state for the condition with the attitude implied by `trim`.
    ///
    /// Sideslip is zero. Pitch follows from the climb-angle constraint and the
    /// body rates from the turn rate.
    pub fn flight_state(&self, trim: &TrimState) -> RigidBodyState {
        let condition = &self.condition;
        let alpha = trim.longitudinal.alpha;
        let phi = trim.lateral.phi;
        let (sin_alpha, cos_alpha) = alpha.sin_cos();
        let (sin_phi, cos_phi) = phi.sin_cos();
        let sin_gamma = condition.gamma.sin();

        let a = cos_alpha;
        let b = cos_phi * sin_alpha;
        let root = (a * a - sin_gamma * sin_gamma + b * b).max(0.0).sqrt();
        let theta = (a * b + sin_gamma * root).atan2(a * a - sin_gamma * sin_gamma);

        let turn_rate = condition.turn_rate;
        let (sin_theta, cos_theta) = theta.sin_cos();
        let angular_rate = Vector3::new(
            -turn_rate * sin_theta,
            turn_rate * sin_phi * cos_theta,
            turn_rate * cos_phi * cos_theta,
        );

        let mut state = RigidBodyState {
            velocity: condition.airspeed * Vector3::new(cos_alpha, 0.0, sin_alpha),
            angular_rate,
            attitude: Vector3::new(phi, theta, wrap_two_pi(condition.heading)),
            position: Vector3::new(0.0, 0.0, -condition.altitude),
        };
        let wind_body = self
            .dynamics
            .sample_environment(&state, &self.environment)
            .wind_body;
        state.velocity += wind_body;
        state
    }

    pub fn controls(&self, trim: &TrimState) -> ControlInputSnapshot {
        self.base_controls
            .clone()
            .with(ControlId::Elevator, trim.longitudinal.elevator)
            .with(ControlId::Throttle, trim.longitudinal.throttle)
            .with(ControlId::Aileron, trim.lateral.aileron)
            .with(ControlId::Rudder, trim.lateral.rudder)
    }

    /// Evaluates the equations of motion at `trim` with the engines at their
    /// steady state for the trim throttle.
    pub fn evaluate(&self, trim: &TrimState) -> (RigidBodyState, ControlInputSnapshot, Evaluation) {
        let state = self.flight_state(trim);
        let controls = self.controls(trim);
        let sample = self.dynamics.sample_environment(&state, &self.environment);

        let mut propulsion = self.propulsion.clone();
        propulsion.settle(&controls, &sample.atmosphere, self.condition.airspeed);

        let inputs = DynamicsInputs {
            controls: &controls,
            environment: &self.environment,
            propulsion: propulsion.total(),
            alpha_dot: 0.0,
        };
        let evaluation = self.dynamics.evaluate(&state, &inputs);
        (state, controls, evaluation)
    }

    fn accelerations(&self, param: &[f64]) -> [f64; 6] {
        let trim = TrimState::from_vector(self.mode, param);
        self.evaluate(&trim).2.accelerations()
    }

    /// Unweighted sum of squared body accelerations.
    pub fn acceleration_cost(&self, param: &[f64]) -> f64 {
        self.accelerations(param).iter().map(|a| a * a).sum()
    }

    /// The accelerations paired with the free variables of the current mode.
    fn residual_vector(&self, param: &[f64]) -> DVector<f64> {
        let accelerations = self.accelerations(param);
        DVector::from_iterator(
            self.mode.dimension(),
            self.mode.residual_indices().iter().map(|&i| accelerations[i]),
        )
    }

    fn ranges(&self) -> Vec<(f64, f64)> {
        let long = &self.settings.longitudinal_bounds;
        let lat = &self.settings.lateral_bounds;
        let mut ranges = vec![long.alpha_range, long.elevator_range, long.throttle_range];
        if self.mode == TrimMode::Combined {
            ranges.extend([lat.phi_range, lat.aileron_range, lat.rudder_range]);
        }
        ranges
    }

    fn calculate_constraint_penalty(&self, value: f64, range: (f64, f64), weight: f64) -> f64 {
        let (min, max) = range;
        let below_min = if value < min { (min - value).powi(2) } else { 0.0 };
        let above_max = if value > max { (value - max).powi(2) } else { 0.0 };
        weight * (below_min + above_max)
    }

    fn clamp_to_bounds(&self, param: &[f64]) -> Vec<f64> {
        param
            .iter()
            .zip(self.ranges())
            .map(|(value, (min, max))| value.clamp(min, max))
            .collect()
    }
}

impl CostFunction for TrimOptimizer {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, param: &Self::Param) -> Result<Self::Output, ArgminError> {
        let accelerations = self.accelerations(param);
        let residual_cost: f64 = accelerations
            .iter()
            .zip(self.settings.residual_weights)
            .map(|(a, weight)| weight * a * a)
            .sum();

        let constraint_cost: f64 = param
            .iter()
            .zip(self.ranges())
            .map(|(value, range)| self.calculate_constraint_penalty(*value, range, 1.0e4))
            .sum();

        let total_cost = residual_cost + constraint_cost;
        if total_cost.is_finite() {
            Ok(total_cost)
        } else {
            Ok(1.0e30)
        }
    }
}

/// Finds the controls and attitude that hold a [`TrimCondition`] steady.
///
/// A Nelder-Mead search gets close, then damped Newton steps on the
/// accelerations polish the answer. Failing to converge is not an error: the
/// best point found comes back with `converged = false`.
#[derive(Debug, Clone)]
pub struct TrimSolver {
    optimizer: TrimOptimizer,
    initial_guess: Option<TrimState>,
}

impl TrimSolver {
    pub fn new(aircraft: &AircraftHandle, condition: TrimCondition) -> Self {
        Self {
            optimizer: TrimOptimizer {
                dynamics: AircraftDynamics::new(aircraft.clone(), &PhysicsConfig::default()),
                propulsion: Propulsion::new(&aircraft.engines),
                environment: EnvironmentSnapshot::calm(),
                base_controls: ControlInputSnapshot::default(),
                mode: condition.mode(),
                condition,
                settings: TrimSolverConfig::default(),
            },
            initial_guess: None,
        }
    }

    pub fn with_settings(mut self, settings: TrimSolverConfig) -> Self {
        self.optimizer.settings = settings;
        self
    }

    pub fn with_physics(mut self, physics: &PhysicsConfig) -> Self {
        let aircraft = self.optimizer.dynamics.aircraft().clone();
        self.optimizer.dynamics = AircraftDynamics::new(aircraft, physics);
        self
    }

    pub fn with_environment(mut self, environment: EnvironmentSnapshot) -> Self {
        self.optimizer.environment = environment;
        self
    }

    /// Positions for the controls trim does not move (flaps, gear,
    /// propeller, mixture).
    pub fn with_controls(mut self, controls: ControlInputSnapshot) -> Self {
        self.optimizer.base_controls = controls;
        self
    }

    pub fn with_initial_guess(mut self, guess: TrimState) -> Self {
        self.initial_guess = Some(guess);
        self
    }

    pub fn optimizer(&self) -> &TrimOptimizer {
        &self.optimizer
    }

    /// Starting point from the lift and pitching-moment balance at the
    /// condition's dynamic pressure.
    pub fn estimate_initial_guess(&self) -> TrimState {
        let optimizer = &self.optimizer;
        let condition = &optimizer.condition;
        let aircraft = optimizer.dynamics.aircraft();
        let settings = &optimizer.settings;
        let gravity = optimizer.dynamics.weight() / optimizer.dynamics.mass();

        let phi = match optimizer.mode {
            TrimMode::LongitudinalOnly => 0.0,
            TrimMode::Combined => (condition.airspeed * condition.turn_rate / gravity).atan(),
        }
        .clamp(settings.lateral_bounds.phi_range.0, settings.lateral_bounds.phi_range.1);

        let atmosphere = optimizer
            .environment
            .sample(condition.altitude, &nalgebra::Rotation3::identity())
            .atmosphere;
        let q_bar = 0.5 * atmosphere.density * condition.airspeed.powi(2);
        let lift_required =
            optimizer.dynamics.weight() * condition.gamma.cos() / phi.cos().max(0.1);

        let coeffs = &aircraft.aero_coef;
        let alpha = if coeffs.lift.cl_alpha.abs() > 1e-6 && q_bar > 0.0 {
            let cl_required = lift_required / (q_bar * aircraft.geometry.wing_area);
            (cl_required - coeffs.lift.cl_0) / coeffs.lift.cl_alpha
        } else {
            0.05
        };
        let (alpha_min, alpha_max) = settings.longitudinal_bounds.alpha_range;
        let alpha = alpha.clamp(alpha_min, alpha_max);

        let elevator = if coeffs.pitch.cm_de.abs() > 1e-6 {
            -(coeffs.pitch.cm_0 + coeffs.pitch.cm_alpha * alpha) / coeffs.pitch.cm_de
        } else {
            0.0
        };
        let (elevator_min, elevator_max) = settings.longitudinal_bounds.elevator_range;

        TrimState {
            longitudinal: LongitudinalTrimState {
                alpha,
                elevator: elevator.clamp(elevator_min, elevator_max),
                throttle: 0.5,
            },
            lateral: LateralTrimState {
                phi,
                ..LateralTrimState::default()
            },
        }
    }

    pub fn solve(&self) -> Result<TrimResult, TrimError> {
        let optimizer = &self.optimizer;
        optimizer
            .condition
            .check()
            .map_err(TrimError::InvalidCondition)?;
        optimizer
            .settings
            .validate()
            .map_err(TrimError::InvalidSettings)?;

        let guess = self
            .initial_guess
            .unwrap_or_else(|| self.estimate_initial_guess());
        let mode = optimizer.mode;
        info!(
            "Trimming {} at {:.1} ft/s, {:.0} ft ({:?})",
            optimizer.dynamics.aircraft().name,
            optimizer.condition.airspeed,
            optimizer.condition.altitude,
            mode
        );

        let (mut param, mut iterations) = self.direct_search(&guess.to_vector(mode))?;
        debug!(
            "Direct search finished after {} iterations, cost {:.3e}",
            iterations,
            optimizer.acceleration_cost(&param)
        );

        if optimizer.settings.use_newton_refinement {
            let (refined, steps) = self.newton_refinement(param);
            param = refined;
            iterations += steps as u64;
        }

        let trim_state = TrimState::from_vector(mode, &param);
        let (state, controls, evaluation) = optimizer.evaluate(&trim_state);
        let cost = evaluation.acceleration_cost();
        let result = TrimResult {
            state,
            controls,
            trim_state,
            converged: cost < optimizer.settings.cost_tolerance,
            cost,
            residuals: evaluation.accelerations(),
            iterations,
        };

        if result.converged {
            info!(
                "Trim converged: alpha {:.4} rad, elevator {:.4} rad, throttle {:.3}",
                trim_state.longitudinal.alpha,
                trim_state.longitudinal.elevator,
                trim_state.longitudinal.throttle
            );
        } else {
            warn!(
                "Trim did not converge after {} iterations, residual norm {:.3e}",
                iterations,
                result.residual_norm()
            );
        }
        Ok(result)
    }

    fn direct_search(&self, init_param: &[f64]) -> Result<(Vec<f64>, u64), TrimError> {
        let n = init_param.len();
        let mut simplex = Vec::with_capacity(n + 1);
        simplex.push(init_param.to_vec());
        for i in 0..n {
            let mut vertex = init_param.to_vec();
            vertex[i] += (0.1 * vertex[i].abs()).max(0.01);
            simplex.push(vertex);
        }

        let settings = &self.optimizer.settings;
        let solver = NelderMead::new(simplex).with_sd_tolerance(settings.simplex_tolerance)?;

        let result = Executor::new(self.optimizer.clone(), solver)
            .configure(|state| {
                state
                    .max_iters(settings.max_iterations)
                    .target_cost(settings.cost_tolerance)
            })
            .run()?;

        let best = result
            .state
            .best_param
            .clone()
            .unwrap_or_else(|| init_param.to_vec());
        Ok((best, result.state.iter))
    }

    /// Damped Newton iteration on the mode's accelerations with a
    /// forward-difference Jacobian. Each step is halved until the cost drops.
    fn newton_refinement(&self, start: Vec<f64>) -> (Vec<f64>, usize) {
        let optimizer = &self.optimizer;
        let settings = &optimizer.settings;
        let n = optimizer.mode.dimension();
        let h = settings.finite_difference_step;

        let mut param = optimizer.clamp_to_bounds(&start);
        let mut cost = optimizer.acceleration_cost(&param);
        let mut steps = 0;

        while steps < settings.newton_iterations && cost >= settings.cost_tolerance {
            steps += 1;
            let residual = optimizer.residual_vector(&param);
            let mut jacobian = DMatrix::<f64>::zeros(n, n);
            for j in 0..n {
                let mut perturbed = param.clone();
                perturbed[j] += h;
                let column = (optimizer.residual_vector(&perturbed) - &residual) / h;
                jacobian.set_column(j, &column);
            }

            let step = match jacobian.lu().solve(&(-&residual)) {
                Some(step) if step.iter().all(|s| s.is_finite()) => step,
                _ => {
                    debug!("Singular trim Jacobian, stopping refinement");
                    break;
                }
            };

            let mut damping = 1.0;
            let mut improved = false;
            while damping > 1e-4 {
                let trial: Vec<f64> = param
                    .iter()
                    .zip(step.iter())
                    .map(|(x, dx)| x + damping * dx)
                    .collect();
                let trial = optimizer.clamp_to_bounds(&trial);
                let trial_cost = optimizer.acceleration_cost(&trial);
                if trial_cost < cost {
                    param = trial;
                    cost = trial_cost;
                    improved = true;
                    break;
                }
                damping *= 0.5;
            }
            if !improved {
                break;
            }
        }
        (param, steps)
    }
}
