use serde::{Deserialize, Serialize};

use crate::components::aircraft::config::ConfigError;
use crate::utils::{GRAVITY, MAX_TIMESTEP, MIN_TIMESTEP};

/// Integration settings shared by the stepper and the trim solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Fixed integration step (s).
    pub dt: f64,
    /// Gravitational acceleration (ft/s²).
    pub gravity: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            dt: 1.0 / 100.0,
            gravity: GRAVITY,
        }
    }
}

impl PhysicsConfig {
    /// Step size from an update rate in Hz.
    pub fn from_rate(hz: f64) -> Result<Self, ConfigError> {
        if !hz.is_finite() || hz <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "update rate must be positive, got {}",
                hz
            )));
        }
        let config = Self {
            dt: 1.0 / hz,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn rate(&self) -> f64 {
        1.0 / self.dt
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.dt.is_finite() || !(MIN_TIMESTEP..=MAX_TIMESTEP).contains(&self.dt) {
            return Err(ConfigError::ValidationError(format!(
                "time step {} s outside [{}, {}]",
                self.dt, MIN_TIMESTEP, MAX_TIMESTEP
            )));
        }
        if !self.gravity.is_finite() || self.gravity < 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "gravity must be finite and non-negative, got {}",
                self.gravity
            )));
        }
        Ok(())
    }
}
