use nalgebra::Vector3;

use crate::components::aircraft::config::InertiaCoefficients;
use crate::components::{
    AirData, AircraftHandle, ControlInputSnapshot, ForceBreakdown, ForceMoment, RigidBodyState,
    StateVector,
};
use crate::resources::{EnvironmentSample, EnvironmentSnapshot, PhysicsConfig};
use crate::systems::aerodynamics::{
    calculate_aerodynamic_forces_moments, calculate_air_data, AeroCoefficientValues,
};

use super::equations::rigid_body_derivative;

/// Weight resolved into body axes from the Euler attitude.
pub fn gravity_force(weight: f64, phi: f64, theta: f64) -> ForceMoment {
    let (sin_phi, cos_phi) = phi.sin_cos();
    let (sin_theta, cos_theta) = theta.sin_cos();
    ForceMoment::new(
        weight * Vector3::new(-sin_theta, sin_phi * cos_theta, cos_phi * cos_theta),
        Vector3::zeros(),
    )
}

/// Everything that drives one derivative evaluation besides the state itself.
#[derive(Debug, Clone, Copy)]
pub struct DynamicsInputs<'a> {
    pub controls: &'a ControlInputSnapshot,
    pub environment: &'a EnvironmentSnapshot,
    /// Engine thrust and moment, held over the step.
    pub propulsion: ForceMoment,
    pub alpha_dot: f64,
}

/// Result of evaluating the force models and equations of motion once.
#[derive(Debug, Clone, Copy)]
pub struct Evaluation {
    pub derivative: StateVector,
    pub loads: ForceBreakdown,
    pub air_data: AirData,
    pub coefficients: AeroCoefficientValues,
    pub environment: EnvironmentSample,
}

impl Evaluation {
    /// Body-axis translational and rotational accelerations.
    pub fn accelerations(&self) -> [f64; 6] {
        let d = &self.derivative;
        [d[0], d[1], d[2], d[3], d[4], d[5]]
    }

    /// Sum of squared body accelerations, the quantity trim drives to zero.
    pub fn acceleration_cost(&self) -> f64 {
        self.accelerations().iter().map(|a| a * a).sum()
    }
}

/// The aircraft's force models and equations of motion bundled for repeated
/// evaluation by the integrator and the trim solver.
#[derive(Debug, Clone)]
pub struct AircraftDynamics {
    aircraft: AircraftHandle,
    mass: f64,
    weight: f64,
    inertia: InertiaCoefficients,
}

impl AircraftDynamics {
    pub fn new(aircraft: AircraftHandle, physics: &PhysicsConfig) -> Self {
        let mass = aircraft.mass.mass();
        let inertia = aircraft.mass.inertia_coefficients();
        Self {
            weight: mass * physics.gravity,
            mass,
            inertia,
            aircraft,
        }
    }

    pub fn aircraft(&self) -> &AircraftHandle {
        &self.aircraft
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Atmosphere and wind seen by the aircraft in `state`.
    pub fn sample_environment(
        &self,
        state: &RigidBodyState,
        environment: &EnvironmentSnapshot,
    ) -> EnvironmentSample {
        environment.sample(state.altitude(), &state.body_to_ned())
    }

    pub fn evaluate(&self, state: &RigidBodyState, inputs: &DynamicsInputs<'_>) -> Evaluation {
        let environment = self.sample_environment(state, inputs.environment);
        let air_data = calculate_air_data(state, &environment);

        let aero = calculate_aerodynamic_forces_moments(
            &self.aircraft.geometry,
            &self.aircraft.aero_coef,
            &air_data,
            &state.angular_rate,
            inputs.controls,
            inputs.alpha_dot,
        );

        let loads = ForceBreakdown {
            aerodynamic: aero.loads,
            propulsive: inputs.propulsion,
            gravitational: gravity_force(self.weight, state.phi(), state.theta()),
        };

        let derivative = rigid_body_derivative(state, &loads.total(), self.mass, &self.inertia);

        Evaluation {
            derivative,
            loads,
            air_data,
            coefficients: aero.coefficients,
            environment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::AircraftSpec;
    use approx::assert_relative_eq;

    #[test]
    fn test_gravity_resolution() {
        let level = gravity_force(1000.0, 0.0, 0.0);
        assert_relative_eq!(level.force, Vector3::new(0.0, 0.0, 1000.0));

        let nose_up = gravity_force(1000.0, 0.0, 0.2);
        assert_relative_eq!(nose_up.force.x, -1000.0 * 0.2f64.sin(), epsilon = 1e-9);

        let banked = gravity_force(1000.0, 0.5, 0.0);
        assert_relative_eq!(banked.force.y, 1000.0 * 0.5f64.sin(), epsilon = 1e-9);
        assert_relative_eq!(banked.force.norm(), 1000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_evaluation_keeps_load_breakdown() {
        let aircraft = AircraftHandle::new(AircraftSpec::navion()).unwrap();
        let dynamics = AircraftDynamics::new(aircraft, &PhysicsConfig::default());
        let state = RigidBodyState::level(250.0, 5_000.0, 0.0);
        let controls = ControlInputSnapshot::default();
        let environment = EnvironmentSnapshot::calm();
        let inputs = DynamicsInputs {
            controls: &controls,
            environment: &environment,
            propulsion: ForceMoment::new(Vector3::new(150.0, 0.0, 0.0), Vector3::zeros()),
            alpha_dot: 0.0,
        };

        let evaluation = dynamics.evaluate(&state, &inputs);
        assert_relative_eq!(evaluation.loads.gravitational.force.z, 2750.0, epsilon = 1e-9);
        assert_eq!(evaluation.loads.propulsive.force.x, 150.0);
        assert_relative_eq!(evaluation.air_data.true_airspeed, 250.0);

        let total = evaluation.loads.total().force;
        assert_relative_eq!(evaluation.derivative[0], total.x / dynamics.mass(), epsilon = 1e-9);
        assert!(evaluation.acceleration_cost() > 0.0);
    }
}
