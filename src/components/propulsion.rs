use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Instantaneous state of one engine, rewritten once per step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineState {
    pub rpm: f64,
    /// Fuel flow (gal/hr).
    pub fuel_flow: f64,
    /// Delivered brake horsepower.
    pub bhp: f64,
    pub advance_ratio: f64,
    /// Thrust, body axes (lbf).
    pub thrust: Vector3<f64>,
    /// Moment of the thrust about the CG, body axes (lbf·ft).
    pub moment: Vector3<f64>,
}

impl Default for EngineState {
    fn default() -> Self {
        Self {
            rpm: 0.0,
            fuel_flow: 0.0,
            bhp: 0.0,
            advance_ratio: 0.0,
            thrust: Vector3::zeros(),
            moment: Vector3::zeros(),
        }
    }
}

/// All engines of one aircraft plus their sum.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropulsionState {
    pub engines: Vec<EngineState>,
}

impl PropulsionState {
    pub fn total_thrust(&self) -> Vector3<f64> {
        self.engines.iter().map(|e| e.thrust).sum()
    }

    pub fn total_moment(&self) -> Vector3<f64> {
        self.engines.iter().map(|e| e.moment).sum()
    }

    pub fn total_fuel_flow(&self) -> f64 {
        self.engines.iter().map(|e| e.fuel_flow).sum()
    }
}
