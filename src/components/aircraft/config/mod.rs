mod aero_coef;
mod aircraft;
mod geometry;
mod loader;
mod mass;
mod propulsion;

pub use aero_coef::{
    AircraftAeroCoefficients, DragCoefficients, LiftCoefficients, PitchCoefficients,
    RollCoefficients, SideForceCoefficients, YawCoefficients,
};
pub use aircraft::{AircraftSource, AircraftSpec, AircraftType};
pub use geometry::AircraftGeometry;
pub use loader::{parse_records, ConfigError, RawAircraftConfig, Records};
pub use mass::{InertiaCoefficients, MassProperties};
pub use propulsion::{EngineKind, EngineSpec, FixedPitchPropSpec};
