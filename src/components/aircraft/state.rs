use nalgebra::{Rotation3, SVector, Vector3};
use serde::{Deserialize, Serialize};

use crate::utils::wrap_euler;

/// Number of integrated states.
pub const STATE_SIZE: usize = 12;

pub type StateVector = SVector<f64, STATE_SIZE>;

/// The integrated rigid-body state.
///
/// Velocities and rates are body axes; position is NED with `down` positive
/// toward the earth, so altitude is `-down`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RigidBodyState {
    /// Body-axis velocity [u, v, w] (ft/s).
    pub velocity: Vector3<f64>,
    /// Body-axis angular rate [p, q, r] (rad/s).
    pub angular_rate: Vector3<f64>,
    /// Euler attitude [phi, theta, psi] (rad).
    pub attitude: Vector3<f64>,
    /// Position [north, east, down] (ft).
    pub position: Vector3<f64>,
}

impl Default for RigidBodyState {
    fn default() -> Self {
        Self {
            velocity: Vector3::zeros(),
            angular_rate: Vector3::zeros(),
            attitude: Vector3::zeros(),
            position: Vector3::zeros(),
        }
    }
}

impl RigidBodyState {
    /// Wings-level flight along the x-axis at `airspeed` ft/s and `altitude` ft.
    pub fn level(airspeed: f64, altitude: f64, heading: f64) -> Self {
        Self {
            velocity: Vector3::new(airspeed, 0.0, 0.0),
            attitude: Vector3::new(0.0, 0.0, heading),
            position: Vector3::new(0.0, 0.0, -altitude),
            ..Default::default()
        }
    }

    pub fn altitude(&self) -> f64 {
        -self.position.z
    }

    pub fn phi(&self) -> f64 {
        self.attitude.x
    }

    pub fn theta(&self) -> f64 {
        self.attitude.y
    }

    pub fn psi(&self) -> f64 {
        self.attitude.z
    }

    /// Rotation taking body-axis vectors into NED.
    pub fn body_to_ned(&self) -> Rotation3<f64> {
        Rotation3::from_euler_angles(self.attitude.x, self.attitude.y, self.attitude.z)
    }

    /// Velocity over the ground in NED (ft/s).
    pub fn ned_velocity(&self) -> Vector3<f64> {
        self.body_to_ned() * self.velocity
    }

    pub fn to_vector(&self) -> StateVector {
        let mut x = StateVector::zeros();
        x.fixed_rows_mut::<3>(0).copy_from(&self.velocity);
        x.fixed_rows_mut::<3>(3).copy_from(&self.angular_rate);
        x.fixed_rows_mut::<3>(6).copy_from(&self.attitude);
        x.fixed_rows_mut::<3>(9).copy_from(&self.position);
        x
    }

    pub fn from_vector(x: &StateVector) -> Self {
        Self {
            velocity: x.fixed_rows::<3>(0).into_owned(),
            angular_rate: x.fixed_rows::<3>(3).into_owned(),
            attitude: x.fixed_rows::<3>(6).into_owned(),
            position: x.fixed_rows::<3>(9).into_owned(),
        }
    }

    pub fn is_finite(&self) -> bool {
        self.to_vector().iter().all(|v| v.is_finite())
    }

    /// Euler angles brought back into their canonical ranges.
    pub fn wrapped(mut self) -> Self {
        let (phi, theta, psi) = wrap_euler(self.attitude.x, self.attitude.y, self.attitude.z);
        self.attitude = Vector3::new(phi, theta, psi);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_vector_layout() {
        let state = RigidBodyState {
            velocity: Vector3::new(1.0, 2.0, 3.0),
            angular_rate: Vector3::new(4.0, 5.0, 6.0),
            attitude: Vector3::new(7.0, 8.0, 9.0),
            position: Vector3::new(10.0, 11.0, 12.0),
        };
        let x = state.to_vector();
        for i in 0..STATE_SIZE {
            assert_eq!(x[i], (i + 1) as f64);
        }
        assert_eq!(RigidBodyState::from_vector(&x), state);
    }

    #[test]
    fn test_altitude_is_negative_down() {
        let state = RigidBodyState::level(200.0, 5_000.0, 0.0);
        assert_eq!(state.position.z, -5_000.0);
        assert_eq!(state.altitude(), 5_000.0);
    }

    #[test]
    fn test_body_to_ned_heading() {
        let state = RigidBodyState::level(100.0, 0.0, FRAC_PI_2);
        let ned = state.ned_velocity();
        assert_relative_eq!(ned, Vector3::new(0.0, 100.0, 0.0), epsilon = 1e-9);
    }

    #[test]
    fn test_body_to_ned_pitch_up_climbs() {
        let mut state = RigidBodyState::level(100.0, 0.0, 0.0);
        state.attitude.y = 0.1;
        let ned = state.ned_velocity();
        assert!(ned.z < 0.0, "nose-up flight must decrease down position");
        assert_relative_eq!(ned.z, -100.0 * 0.1f64.sin(), epsilon = 1e-9);
    }

    #[test]
    fn test_wrapped() {
        let mut state = RigidBodyState::default();
        state.attitude = Vector3::new(7.0, 0.2, -1.0);
        let wrapped = state.wrapped();
        assert_relative_eq!(wrapped.phi(), 7.0 - std::f64::consts::TAU, epsilon = 1e-12);
        assert_relative_eq!(wrapped.psi(), std::f64::consts::TAU - 1.0, epsilon = 1e-12);
    }
}
