use serde::{Deserialize, Serialize};

use crate::utils::{
    AIR_GAS_CONSTANT, ATMOSPHERE_CEILING, HEAT_CAPACITY_RATIO, ISA_LAPSE_RATE,
    ISA_SEA_LEVEL_DENSITY, ISA_SEA_LEVEL_PRESSURE, ISA_SEA_LEVEL_TEMP, STANDARD_GRAVITY,
    TROPOPAUSE_ALTITUDE,
};

/// Air properties at one altitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AtmosphereSample {
    /// Altitude the sample was taken at, after clamping to the table (ft).
    pub altitude: f64,
    /// Static temperature (°R).
    pub temperature: f64,
    /// Static pressure (lbf/ft²).
    pub pressure: f64,
    /// Air density (slug/ft³).
    pub density: f64,
    /// Speed of sound (ft/s).
    pub speed_of_sound: f64,
}

impl AtmosphereSample {
    /// Ratio of local density to standard sea-level density (σ).
    pub fn density_ratio(&self) -> f64 {
        self.density / ISA_SEA_LEVEL_DENSITY
    }
}

impl Default for AtmosphereSample {
    fn default() -> Self {
        StandardAtmosphere::sample(0.0)
    }
}

/// 1976 standard atmosphere, troposphere and lower stratosphere.
///
/// The troposphere uses a linear temperature lapse up to the tropopause and the
/// stratosphere is isothermal up to the table ceiling. Altitudes below sea level
/// return sea-level values and altitudes above the ceiling return the ceiling
/// values; neither case is an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardAtmosphere;

impl StandardAtmosphere {
    pub fn sample(altitude: f64) -> AtmosphereSample {
        Self::sample_with_offset(altitude, 0.0)
    }

    /// Sample with a temperature deviation from standard (°R).
    ///
    /// Pressure follows the standard profile; density is recomputed from the
    /// offset temperature through the ideal gas law.
    pub fn sample_with_offset(altitude: f64, temperature_offset: f64) -> AtmosphereSample {
        let altitude = if altitude.is_finite() {
            altitude.clamp(0.0, ATMOSPHERE_CEILING)
        } else {
            0.0
        };

        let (standard_temperature, pressure) = Self::temperature_and_pressure(altitude);
        let temperature = (standard_temperature + temperature_offset).max(1.0);
        let density = pressure / (AIR_GAS_CONSTANT * temperature);
        let speed_of_sound = (HEAT_CAPACITY_RATIO * AIR_GAS_CONSTANT * temperature).sqrt();

        AtmosphereSample {
            altitude,
            temperature,
            pressure,
            density,
            speed_of_sound,
        }
    }

    fn temperature_and_pressure(altitude: f64) -> (f64, f64) {
        let exponent = -STANDARD_GRAVITY / (ISA_LAPSE_RATE * AIR_GAS_CONSTANT);

        if altitude <= TROPOPAUSE_ALTITUDE {
            let temperature = ISA_SEA_LEVEL_TEMP + ISA_LAPSE_RATE * altitude;
            let pressure =
                ISA_SEA_LEVEL_PRESSURE * (temperature / ISA_SEA_LEVEL_TEMP).powf(exponent);
            (temperature, pressure)
        } else {
            let tropopause_temperature = ISA_SEA_LEVEL_TEMP + ISA_LAPSE_RATE * TROPOPAUSE_ALTITUDE;
            let tropopause_pressure = ISA_SEA_LEVEL_PRESSURE
                * (tropopause_temperature / ISA_SEA_LEVEL_TEMP).powf(exponent);
            let pressure = tropopause_pressure
                * (-STANDARD_GRAVITY * (altitude - TROPOPAUSE_ALTITUDE)
                    / (AIR_GAS_CONSTANT * tropopause_temperature))
                    .exp();
            (tropopause_temperature, pressure)
        }
    }
}
