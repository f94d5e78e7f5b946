pub mod aircraft;
pub mod controls;
pub mod physics;
pub mod propulsion;
pub mod trim;

pub use aircraft::{
    parse_records, AirData, AircraftAeroCoefficients, AircraftGeometry, AircraftHandle,
    AircraftSource, AircraftSpec, AircraftType, ConfigError, EngineKind, EngineSpec,
    FixedPitchPropSpec, MassProperties, RawAircraftConfig, Records, RigidBodyState, StateVector,
    STATE_SIZE,
};
pub use controls::{ControlId, ControlInputSnapshot};
pub use physics::{ForceBreakdown, ForceCategory, ForceMoment};
pub use propulsion::{EngineState, PropulsionState};
pub use trim::{
    LateralBounds, LateralTrimState, LongitudinalBounds, LongitudinalTrimState, TrimCondition,
    TrimError, TrimMode, TrimOptimizer, TrimResult, TrimSolver, TrimSolverConfig, TrimState,
};
