use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::components::{ControlInputSnapshot, RigidBodyState};

/// Steady flight condition to trim for
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrimCondition {
    /// True airspeed (ft/s)
    pub airspeed: f64,
    /// Altitude above sea level (ft)
    pub altitude: f64,
    /// Heading (rad)
    pub heading: f64,
    /// Flight-path angle, positive climbing (rad)
    pub gamma: f64,
    /// Heading rate, positive turning right (rad/s)
    pub turn_rate: f64,
}

impl TrimCondition {
    pub fn straight_and_level(airspeed: f64, altitude: f64) -> Self {
        Self {
            airspeed,
            altitude,
            heading: 0.0,
            gamma: 0.0,
            turn_rate: 0.0,
        }
    }

    pub fn with_heading(mut self, heading: f64) -> Self {
        self.heading = heading;
        self
    }

    pub fn with_climb_angle(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    pub fn with_turn_rate(mut self, turn_rate: f64) -> Self {
        self.turn_rate = turn_rate;
        self
    }

    /// Which set of free variables the condition needs.
    pub fn mode(&self) -> TrimMode {
        if self.turn_rate == 0.0 {
            TrimMode::LongitudinalOnly
        } else {
            TrimMode::Combined
        }
    }

    pub fn check(&self) -> Result<(), String> {
        let fields = [
            ("airspeed", self.airspeed),
            ("altitude", self.altitude),
            ("heading", self.heading),
            ("gamma", self.gamma),
            ("turn_rate", self.turn_rate),
        ];
        if let Some((name, value)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(format!("{} must be finite, got {}", name, value));
        }
        if self.airspeed <= 0.0 {
            return Err(format!("airspeed must be positive, got {}", self.airspeed));
        }
        if self.gamma.abs() >= std::f64::consts::FRAC_PI_2 {
            return Err(format!("climb angle {} is not flyable", self.gamma));
        }
        Ok(())
    }
}

/// Which variables the solver is free to move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrimMode {
    /// Angle of attack, elevator and throttle; wings level
    LongitudinalOnly,
    /// Longitudinal variables plus bank angle, aileron and rudder, sideslip held at zero
    Combined,
}

impl TrimMode {
    pub fn dimension(&self) -> usize {
        match self {
            TrimMode::LongitudinalOnly => 3,
            TrimMode::Combined => 6,
        }
    }

    /// Indices of the body accelerations [u̇, v̇, ẇ, ṗ, q̇, ṙ] that are driven
    /// to zero, one per free variable.
    pub fn residual_indices(&self) -> &'static [usize] {
        match self {
            TrimMode::LongitudinalOnly => &[0, 2, 4],
            TrimMode::Combined => &[0, 1, 2, 3, 4, 5],
        }
    }
}

/// Longitudinal trim state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LongitudinalTrimState {
    pub alpha: f64,
    pub elevator: f64,
    pub throttle: f64,
}

/// Lateral trim state
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LateralTrimState {
    pub phi: f64,
    pub aileron: f64,
    pub rudder: f64,
}

/// Free variables of one trim evaluation
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TrimState {
    pub longitudinal: LongitudinalTrimState,
    pub lateral: LateralTrimState,
}

impl Default for LongitudinalTrimState {
    fn default() -> Self {
        Self {
            alpha: 0.05,
            elevator: 0.0,
            throttle: 0.5,
        }
    }
}

impl LongitudinalTrimState {
    pub fn to_vector(&self) -> Vec<f64> {
        vec![self.alpha, self.elevator, self.throttle]
    }

    pub fn from_vector(vec: &[f64]) -> Self {
        Self {
            alpha: vec[0],
            elevator: vec[1],
            throttle: vec[2],
        }
    }
}

impl LateralTrimState {
    pub fn to_vector(&self) -> Vec<f64> {
        vec![self.phi, self.aileron, self.rudder]
    }

    pub fn from_vector(vec: &[f64]) -> Self {
        Self {
            phi: vec[0],
            aileron: vec[1],
            rudder: vec[2],
        }
    }
}

impl TrimState {
    /// Parameter vector for `mode`: longitudinal variables first.
    pub fn to_vector(&self, mode: TrimMode) -> Vec<f64> {
        let mut vec = self.longitudinal.to_vector();
        if mode == TrimMode::Combined {
            vec.extend(self.lateral.to_vector());
        }
        vec
    }

    /// Inverse of [`TrimState::to_vector`]; lateral variables are zero in
    /// longitudinal mode.
    pub fn from_vector(mode: TrimMode, vec: &[f64]) -> Self {
        let lateral = match mode {
            TrimMode::LongitudinalOnly => LateralTrimState::default(),
            TrimMode::Combined => LateralTrimState::from_vector(&vec[3..6]),
        };
        Self {
            longitudinal: LongitudinalTrimState::from_vector(&vec[0..3]),
            lateral,
        }
    }
}

/// Outcome of a trim attempt; returned whether or not it converged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrimResult {
    /// Rigid-body state matching the condition at the solution
    pub state: RigidBodyState,
    /// Controls at the solution
    pub controls: ControlInputSnapshot,
    pub trim_state: TrimState,
    pub converged: bool,
    /// Summed squared body accelerations
    pub cost: f64,
    /// Body accelerations [u̇, v̇, ẇ, ṗ, q̇, ṙ] at the solution
    pub residuals: [f64; 6],
    pub iterations: u64,
}

impl TrimResult {
    /// Norm of the body acceleration residuals.
    pub fn residual_norm(&self) -> f64 {
        self.residuals.iter().map(|r| r * r).sum::<f64>().sqrt()
    }

    pub fn linear_residual(&self) -> Vector3<f64> {
        Vector3::new(self.residuals[0], self.residuals[1], self.residuals[2])
    }

    pub fn angular_residual(&self) -> Vector3<f64> {
        Vector3::new(self.residuals[3], self.residuals[4], self.residuals[5])
    }
}
