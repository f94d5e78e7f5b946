use sixdof::{
    build_aircraft,
    components::{
        AircraftAeroCoefficients, AircraftHandle, AircraftSpec, ControlId, ControlInputSnapshot,
    },
};

pub fn create_navion() -> AircraftHandle {
    build_aircraft(AircraftSpec::navion()).expect("Navion definition is valid")
}

/// Navion airframe with every derivative zeroed and no engines, so only
/// gravity acts.
pub fn create_ballistic_aircraft() -> AircraftHandle {
    let spec = AircraftSpec {
        name: "ballistic".to_string(),
        aero_coef: AircraftAeroCoefficients::default(),
        engines: Vec::new(),
        ..AircraftSpec::navion()
    };
    build_aircraft(spec).expect("ballistic definition is valid")
}

pub fn cruise_controls(throttle: f64) -> ControlInputSnapshot {
    ControlInputSnapshot::default().with(ControlId::Throttle, throttle)
}
