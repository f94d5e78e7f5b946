mod equations;
mod force_calculator;
mod integrator;

pub use equations::{alpha_rate, rigid_body_derivative};
pub use force_calculator::{
    gravity_force, AircraftDynamics, DynamicsInputs, Evaluation,
};
pub use integrator::{integrate_step, rk4_step, IntegrationStep};
