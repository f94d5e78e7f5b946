mod fixed_pitch;
mod powerplant;

pub use fixed_pitch::FixedPitchPropEngine;
pub use powerplant::{build_powerplant, Powerplant, Propulsion};
