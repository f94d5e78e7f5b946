mod air_data;
mod force_calculator;

pub use air_data::{calculate_air_data, MIN_AIRSPEED_THRESHOLD};
pub use force_calculator::{
    calculate_aerodynamic_forces_moments, AeroCoefficientValues, AeroForces,
};
