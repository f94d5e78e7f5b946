use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::utils::ISA_SEA_LEVEL_DENSITY;

/// Air-relative quantities derived from the body velocity and the atmosphere.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AirData {
    /// True airspeed (ft/s).
    pub true_airspeed: f64,
    /// Angle of attack (rad).
    pub alpha: f64,
    /// Sideslip angle (rad).
    pub beta: f64,
    /// Dynamic pressure ½ρV² (lbf/ft²).
    pub dynamic_pressure: f64,
    /// Air density (slug/ft³).
    pub density: f64,
    pub mach: f64,
    /// Air-relative velocity, body axes (ft/s).
    pub relative_velocity: Vector3<f64>,
    /// Wind velocity, body axes (ft/s).
    pub wind_velocity: Vector3<f64>,
}

impl Default for AirData {
    /// Zero airspeed and no wind at sea level.
    fn default() -> Self {
        Self {
            true_airspeed: 0.0,
            alpha: 0.0,
            beta: 0.0,
            dynamic_pressure: 0.0,
            density: ISA_SEA_LEVEL_DENSITY,
            mach: 0.0,
            relative_velocity: Vector3::zeros(),
            wind_velocity: Vector3::zeros(),
        }
    }
}
