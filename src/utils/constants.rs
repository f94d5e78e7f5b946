// Imperial units throughout: ft, slug, lbf, °R, s.

pub const GRAVITY: f64 = 32.2; // ft/s^2, weight-to-mass conversion used by the airframe data
pub const STANDARD_GRAVITY: f64 = 32.174; // ft/s^2, used by the atmosphere tables
pub const AIR_GAS_CONSTANT: f64 = 1716.49; // ft·lbf/(slug·°R)
pub const HEAT_CAPACITY_RATIO: f64 = 1.4;

pub const ISA_SEA_LEVEL_TEMP: f64 = 518.67; // °R
pub const ISA_SEA_LEVEL_PRESSURE: f64 = 2116.22; // lbf/ft^2
pub const ISA_SEA_LEVEL_DENSITY: f64 = 0.002377; // slug/ft^3
pub const ISA_LAPSE_RATE: f64 = -0.00356616; // °R/ft
pub const TROPOPAUSE_ALTITUDE: f64 = 36_089.24; // ft
pub const ATMOSPHERE_CEILING: f64 = 65_616.8; // ft

pub const KNOTS_TO_FPS: f64 = 1.687810;
pub const HP_TO_FTLBS: f64 = 550.0;

/// Spherical-earth radius behind the latitude/longitude placeholder (ft).
pub const EARTH_RADIUS: f64 = 20_903_520.0;

pub const MIN_TIMESTEP: f64 = 1.0 / 1000.0;
pub const MAX_TIMESTEP: f64 = 1.0 / 10.0;
