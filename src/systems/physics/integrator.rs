use crate::components::{RigidBodyState, StateVector};

use super::equations::alpha_rate;
use super::force_calculator::{AircraftDynamics, DynamicsInputs, Evaluation};

/// One classical fourth-order Runge–Kutta step of `x' = f(x)`.
pub fn rk4_step<F>(x: &StateVector, dt: f64, mut f: F) -> StateVector
where
    F: FnMut(&StateVector) -> StateVector,
{
    let k1 = f(x);
    let k2 = f(&(x + k1 * (dt / 2.0)));
    let k3 = f(&(x + k2 * (dt / 2.0)));
    let k4 = f(&(x + k3 * dt));

    x + (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (dt / 6.0)
}

/// Outcome of advancing the rigid body by one step.
#[derive(Debug, Clone, Copy)]
pub struct IntegrationStep {
    /// New state with the Euler angles wrapped.
    pub state: RigidBodyState,
    /// Force models and derivative re-evaluated at the new state.
    pub evaluation: Evaluation,
    /// Angle-of-attack rate for the next step's unsteady terms.
    pub alpha_dot: f64,
}

/// Advances `state` by `dt`.
///
/// The aerodynamic and gravity models are re-evaluated at every stage; the
/// propulsion loads and alpha-dot in `inputs` are held for the whole step.
pub fn integrate_step(
    dynamics: &AircraftDynamics,
    state: &RigidBodyState,
    inputs: &DynamicsInputs<'_>,
    dt: f64,
) -> IntegrationStep {
    let x0 = state.to_vector();
    let x1 = rk4_step(&x0, dt, |x| {
        dynamics
            .evaluate(&RigidBodyState::from_vector(x), inputs)
            .derivative
    });

    let state = RigidBodyState::from_vector(&x1).wrapped();
    let evaluation = dynamics.evaluate(&state, inputs);

    let relative = evaluation.air_data.relative_velocity;
    let d = &evaluation.derivative;
    let alpha_dot = alpha_rate(relative.x, relative.z, d[0], d[2]);

    IntegrationStep {
        state,
        evaluation,
        alpha_dot,
    }
}
