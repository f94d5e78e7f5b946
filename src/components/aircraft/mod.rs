pub mod air_data;
pub mod config;
pub mod state;

pub use air_data::AirData;
pub use config::{
    parse_records, AircraftAeroCoefficients, AircraftGeometry, AircraftSource, AircraftSpec,
    AircraftType, ConfigError, EngineKind, EngineSpec, FixedPitchPropSpec, MassProperties,
    RawAircraftConfig, Records,
};
pub use state::{RigidBodyState, StateVector, STATE_SIZE};

use std::ops::Deref;
use std::sync::Arc;

/// Shared, validated, read-only aircraft definition.
///
/// Cloning is cheap; every consumer sees the same definition.
#[derive(Debug, Clone)]
pub struct AircraftHandle(Arc<AircraftSpec>);

impl AircraftHandle {
    /// Validates `spec` and freezes it.
    pub fn new(spec: AircraftSpec) -> Result<Self, ConfigError> {
        spec.validate()?;
        Ok(Self(Arc::new(spec)))
    }

    pub fn spec(&self) -> &AircraftSpec {
        &self.0
    }
}

impl Deref for AircraftHandle {
    type Target = AircraftSpec;

    fn deref(&self) -> &AircraftSpec {
        &self.0
    }
}
