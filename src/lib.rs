pub mod components;
pub mod resources;
pub mod simulation;
pub mod systems;
pub mod utils;

use components::{
    AircraftHandle, AircraftSpec, ConfigError, ControlInputSnapshot, RigidBodyState,
    TrimCondition, TrimError, TrimResult, TrimSolver,
};
use resources::SimulationConfig;
use simulation::{SimError, SimulationHandle};

/// Validates `spec` and returns the shared, read-only handle every other
/// part of the crate works from.
pub fn build_aircraft(spec: AircraftSpec) -> Result<AircraftHandle, ConfigError> {
    AircraftHandle::new(spec)
}

/// Trims `aircraft` for `condition` in calm air with default solver settings.
/// Use [`TrimSolver`] directly for anything else.
pub fn trim(aircraft: &AircraftHandle, condition: &TrimCondition) -> Result<TrimResult, TrimError> {
    TrimSolver::new(aircraft, *condition).solve()
}

/// Creates a simulation handle and starts its loop.
pub fn start_loop(
    aircraft: AircraftHandle,
    initial_state: RigidBodyState,
    controls: ControlInputSnapshot,
    config: SimulationConfig,
) -> Result<SimulationHandle, SimError> {
    let mut handle = SimulationHandle::new(aircraft, initial_state, controls, config)?;
    handle.start()?;
    Ok(handle)
}
