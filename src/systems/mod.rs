pub mod aerodynamics;
pub mod physics;
pub mod propulsion;

pub use aerodynamics::{
    calculate_aerodynamic_forces_moments, calculate_air_data, AeroCoefficientValues, AeroForces,
    MIN_AIRSPEED_THRESHOLD,
};
pub use physics::{
    alpha_rate, gravity_force, integrate_step, rigid_body_derivative, rk4_step,
    AircraftDynamics, DynamicsInputs, Evaluation, IntegrationStep,
};
pub use propulsion::{build_powerplant, FixedPitchPropEngine, Powerplant, Propulsion};
