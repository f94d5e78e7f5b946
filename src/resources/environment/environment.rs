use nalgebra::{Rotation3, Vector3};
use serde::{Deserialize, Serialize};

use super::atmosphere::{AtmosphereSample, StandardAtmosphere};

/// Wind and atmosphere overrides published by an environment producer.
///
/// Wind is given in NED axes as the velocity of the air mass (the direction the
/// air moves toward), in ft/s.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentSnapshot {
    pub wind_ned: Vector3<f64>,
    /// Deviation from the standard temperature profile (°R).
    pub temperature_offset: f64,
    /// Replaces the computed density when set (slug/ft³).
    pub density_override: Option<f64>,
}

impl Default for EnvironmentSnapshot {
    fn default() -> Self {
        Self {
            wind_ned: Vector3::zeros(),
            temperature_offset: 0.0,
            density_override: None,
        }
    }
}

impl EnvironmentSnapshot {
    pub fn calm() -> Self {
        Self::default()
    }

    /// Steady wind of `speed` ft/s blowing from the compass heading `from_deg`.
    pub fn with_constant_wind(speed: f64, from_deg: f64) -> Self {
        let toward = from_deg.to_radians() + std::f64::consts::PI;
        Self {
            wind_ned: Vector3::new(speed * toward.cos(), speed * toward.sin(), 0.0),
            ..Self::default()
        }
    }

    pub fn with_temperature_offset(mut self, offset: f64) -> Self {
        self.temperature_offset = offset;
        self
    }

    pub fn with_density_override(mut self, density: f64) -> Self {
        self.density_override = Some(density);
        self
    }

    /// Atmosphere and wind at `altitude` for an aircraft whose body-to-NED
    /// rotation is `body_to_ned`.
    pub fn sample(&self, altitude: f64, body_to_ned: &Rotation3<f64>) -> EnvironmentSample {
        let mut atmosphere = StandardAtmosphere::sample_with_offset(altitude, self.temperature_offset);

        if let Some(density) = self.density_override.filter(|d| d.is_finite() && *d > 0.0) {
            atmosphere.density = density;
        }

        let wind_ned = if self.wind_ned.iter().all(|c| c.is_finite()) {
            self.wind_ned
        } else {
            Vector3::zeros()
        };

        EnvironmentSample {
            atmosphere,
            wind_ned,
            wind_body: body_to_ned.inverse() * wind_ned,
        }
    }
}

/// Everything the force models need from the environment for one evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvironmentSample {
    pub atmosphere: AtmosphereSample,
    pub wind_ned: Vector3<f64>,
    pub wind_body: Vector3<f64>,
}
